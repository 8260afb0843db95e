// mailsig – DKIM and DomainKeys signature generation
// Copyright © 2025–2026 The mailsig developers
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! A library producing email authentication signature headers: the
//! *DKIM-Signature* header of [RFC 4871], and the older *DomainKey-Signature*
//! header of [RFC 4870].
//!
//! The entry point is the [`Signer`] type, which pairs a private RSA signing
//! key with the signing domain and selector. Given the ordered headers to be
//! signed and the raw message body, [`Signer::dkim_header`] and
//! [`Signer::domain_key_header`] return a complete, folded header string ready
//! for prepending to the outgoing message.
//!
//! Responsibility ends at producing the header string. Transmitting the mail,
//! generating or publishing keys in DNS, and verifying signatures are left to
//! external collaborators.
//!
//! Both RFCs fix the signature algorithm modelled here to *rsa-sha1*. DKIM
//! signatures use relaxed/relaxed canonicalization; DomainKey signatures use
//! the *nofws* canonicalization. The canonicalization building blocks are
//! exposed in the [`canonicalize`] module for users assembling their own
//! signing facilities.
//!
//! # Usage
//!
//! ```no_run
//! use mailsig::{HeaderFields, Signer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pem = std::fs::read_to_string("signing.pem")?;
//! let signer = Signer::from_pem(&pem, "example.com", "sel1")?;
//!
//! let headers: HeaderFields = "From: me <me@example.com>\r\n\
//!     To: you@example.org\r\n\
//!     Subject: hi".parse()?;
//!
//! let header = signer.dkim_header("from:to:subject", &headers, b"Hello!\r\n")?;
//! // prepend `header` to the outgoing message
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 4870]: https://www.rfc-editor.org/rfc/rfc4870
//! [RFC 4871]: https://www.rfc-editor.org/rfc/rfc4871

pub mod canonicalize;
pub mod crypto;
pub mod header;
pub mod signer;
mod util;

pub use crate::{
    crypto::{KeyLoadError, SigningError, SigningKey},
    header::{FieldBody, FieldName, HeaderField, HeaderFieldError, HeaderFields},
    signer::Signer,
    util::{decode_base64, encode_base64, Base64Error},
};
