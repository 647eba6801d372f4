//! CSV line splitter
//!
//! Splits one raw line into fields. A double quote toggles quoted mode, two
//! consecutive quotes inside a quoted field are a literal quote, and a comma
//! outside quoted mode ends the field. Malformed quoting never fails: an
//! unterminated quote consumes to end of line. The caller splits the file
//! into lines first.

/// Split a single CSV line into its fields.
pub fn split_line(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                out.push(std::mem::take(&mut cur));
            }
            _ => cur.push(ch),
        }
    }
    out.push(cur);
    out
}
