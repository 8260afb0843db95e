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

//! Formatting of signature headers: tag-string wrapping and signature folding.

/// Maximum width of a signature header line, including the tab indentation of
/// continuation lines.
pub const LINE_WIDTH: usize = 76;

const FOLD: &str = "\r\n\t";

/// Wraps a tag string at [`LINE_WIDTH`] columns, breaking at spaces with a
/// CRLF + tab continuation.
///
/// Continuation breaks already present in the input are kept and restart the
/// column count. A word too long for one line is left unbroken.
pub fn wrap_tags(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 16);
    let mut col = 0;

    for (i, segment) in value.split(FOLD).enumerate() {
        if i > 0 {
            out.push_str(FOLD);
            col = 1;
        }
        for (j, word) in segment.split(' ').enumerate() {
            let len = word.chars().count();
            if j == 0 {
                out.push_str(word);
                col += len;
            } else if col + 1 + len <= LINE_WIDTH {
                out.push(' ');
                out.push_str(word);
                col += len + 1;
            } else {
                out.push_str(FOLD);
                out.push_str(word);
                col = 1 + len;
            }
        }
    }

    out
}

/// Returns the column width of the final line of `s`, the tab of a
/// continuation line counting as one column.
pub fn last_line_width(s: &str) -> usize {
    match s.rfind("\r\n") {
        Some(i) => s[i + 2..].chars().count(),
        None => s.chars().count(),
    }
}

/// Appends ASCII `data` to `out` starting at column `col`, folding with
/// CRLF + tab continuations so that no line exceeds [`LINE_WIDTH`] columns.
pub fn fold_into(out: &mut String, col: usize, data: &str) {
    debug_assert!(data.is_ascii());

    let mut col = col;
    let mut rest = data;

    while !rest.is_empty() {
        let room = LINE_WIDTH.saturating_sub(col);
        if room == 0 {
            out.push_str(FOLD);
            col = 1;
            continue;
        }

        let (chunk, tail) = rest.split_at(room.min(rest.len()));
        out.push_str(chunk);
        col += chunk.len();
        rest = tail;

        if !rest.is_empty() {
            out.push_str(FOLD);
            col = 1;
        }
    }
}
