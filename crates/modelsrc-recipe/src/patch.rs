use crate::RecipeError;
use modelsrc_schema::SourceEntry;

/// Array key rewritten by default.
pub const SOURCE_KEY: &str = "source";

const INDENT: &str = "    ";

/// Byte offsets of an array's `(` and its matching `)`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySpan {
    pub open: usize,
    pub close: usize,
}

/// Find the first `key=( ... )` array in `text`.
///
/// The key must begin a statement (start of line after optional whitespace,
/// or after `;`) on a line that is not commented out. The closing `)` is the
/// first one at depth zero that is not quoted or inside a `#` comment.
pub fn locate_array(text: &str, key: &str) -> Result<ArraySpan, RecipeError> {
    locate_array_bytes(text.as_bytes(), key)
}

/// [`locate_array`] over raw bytes. Only ASCII markers are inspected, so
/// text in any ASCII-compatible encoding is accepted.
pub fn locate_array_bytes(text: &[u8], key: &str) -> Result<ArraySpan, RecipeError> {
    let open = find_open(text, key).ok_or_else(|| RecipeError::AnchorNotFound {
        key: key.to_owned(),
    })?;
    let close = find_close(text, open).ok_or_else(|| RecipeError::UnclosedArray {
        key: key.to_owned(),
        line: line_of(text, open),
    })?;
    Ok(ArraySpan { open, close })
}

/// Replace the body of the `key` array with one quoted line per entry.
///
/// Bytes before the `(` and after the matching `)` are copied unchanged, so
/// patching the output again with the same entries is a no-op.
pub fn patch_source_array(
    text: &str,
    key: &str,
    entries: &[SourceEntry],
) -> Result<String, RecipeError> {
    let span = locate_array(text, key)?;
    let prefix = &text[..span.open];
    let suffix = &text[span.close + 1..];
    let block = render_array(entries, line_ending(prefix.as_bytes(), suffix.as_bytes()));

    let mut out = String::with_capacity(prefix.len() + block.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(&block);
    out.push_str(suffix);
    Ok(out)
}

/// [`patch_source_array`] over raw bytes; nothing outside the array has to
/// be valid UTF-8.
pub fn patch_source_bytes(
    text: &[u8],
    key: &str,
    entries: &[SourceEntry],
) -> Result<Vec<u8>, RecipeError> {
    let span = locate_array_bytes(text, key)?;
    let prefix = &text[..span.open];
    let suffix = &text[span.close + 1..];
    let block = render_array(entries, line_ending(prefix, suffix));

    let mut out = Vec::with_capacity(prefix.len() + block.len() + suffix.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(block.as_bytes());
    out.extend_from_slice(suffix);
    Ok(out)
}

fn line_ending(prefix: &[u8], suffix: &[u8]) -> &'static str {
    let crlf = |b: &[u8]| b.windows(2).any(|w| w == b"\r\n");
    if crlf(prefix) || crlf(suffix) {
        "\r\n"
    } else {
        "\n"
    }
}

/// Render `( ... )` with each entry's source line single-quoted on its own line.
pub fn render_array(entries: &[SourceEntry], line_ending: &str) -> String {
    let mut out = String::from("(");
    out.push_str(line_ending);
    for entry in entries {
        out.push_str(INDENT);
        out.push_str(&shell_quote(&entry.source_line()));
        out.push_str(line_ending);
    }
    out.push(')');
    out
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn find_open(text: &[u8], key: &str) -> Option<usize> {
    let needle = format!("{key}=(");
    let needle = needle.as_bytes();
    text.windows(needle.len())
        .enumerate()
        .find(|(at, window)| *window == needle && starts_statement(text, *at))
        .map(|(at, _)| at + needle.len() - 1)
}

fn starts_statement(text: &[u8], at: usize) -> bool {
    let line_start = text[..at]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let prefix = &text[line_start..at];
    if prefix.contains(&b'#') {
        return false;
    }
    match prefix.last() {
        None => true,
        Some(&b) => b.is_ascii_whitespace() || b == b';',
    }
}

fn find_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut word_start = true;
    let mut i = open + 1;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'\'') => {
                if b == b'\'' {
                    quote = None;
                }
            }
            Some(_) => match b {
                b'\\' => i += 1,
                b'"' => quote = None,
                _ => {}
            },
            None => match b {
                b'\\' => i += 1,
                b'\'' | b'"' => quote = Some(b),
                b'#' if word_start => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'(' => depth += 1,
                b')' => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                _ => {}
            },
        }
        word_start = quote.is_none() && (b.is_ascii_whitespace() || b == b'(');
        i += 1;
    }
    None
}

fn line_of(text: &[u8], offset: usize) -> usize {
    text[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKGBUILD: &str = "# Maintainer: Jane Doe <jane@example.org>
pkgname=ollama-tinyllama
pkgver=1.1
pkgrel=1
arch=('any')
source=(
    'https://registry.ollama.ai/v2/library/tinyllama/blobs/sha256:old'
    'manifest.json::https://registry.ollama.ai/v2/library/tinyllama/manifests/latest'
)
sha256sums=('SKIP'
            'SKIP')

package() {
  install -d \"$pkgdir/usr/share/ollama\"
}
";

    fn entries() -> Vec<SourceEntry> {
        vec![
            SourceEntry {
                filename: "sha256-aaa".to_owned(),
                url: "https://r/v2/library/foo/blobs/sha256:aaa".to_owned(),
            },
            SourceEntry {
                filename: "manifest.json".to_owned(),
                url: "https://r/v2/library/foo/manifests/v1".to_owned(),
            },
        ]
    }

    const BLOCK: &str = "(
    'https://r/v2/library/foo/blobs/sha256:aaa'
    'manifest.json::https://r/v2/library/foo/manifests/v1'
)";

    #[test]
    fn anchor_absent_fails() {
        let err = patch_source_array("pkgname=x\nsha256sums=()\n", SOURCE_KEY, &entries())
            .unwrap_err();
        assert!(matches!(err, RecipeError::AnchorNotFound { ref key } if key == "source"));
    }

    #[test]
    fn anchor_with_empty_body() {
        let text = "pkgname=x\nsource=()\nmd5sums=()\n";
        let out = patch_source_array(text, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, format!("pkgname=x\nsource={BLOCK}\nmd5sums=()\n"));
    }

    #[test]
    fn anchor_with_existing_entries() {
        let out = patch_source_array(PKGBUILD, SOURCE_KEY, &entries()).unwrap();
        let expected = PKGBUILD.replace(
            "(
    'https://registry.ollama.ai/v2/library/tinyllama/blobs/sha256:old'
    'manifest.json::https://registry.ollama.ai/v2/library/tinyllama/manifests/latest'
)",
            BLOCK,
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn close_marker_on_same_line_as_open() {
        let text = "source=('a.tar.gz' 'b.patch') # upstream\nbuild() { :; }\n";
        let out = patch_source_array(text, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, format!("source={BLOCK} # upstream\nbuild() {{ :; }}\n"));
    }

    #[test]
    fn patching_is_idempotent() {
        let once = patch_source_array(PKGBUILD, SOURCE_KEY, &entries()).unwrap();
        let twice = patch_source_array(&once, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn prefix_and_suffix_are_byte_identical() {
        let span = locate_array(PKGBUILD, SOURCE_KEY).unwrap();
        let prefix = &PKGBUILD[..span.open];
        let suffix = &PKGBUILD[span.close + 1..];

        let out = patch_source_array(PKGBUILD, SOURCE_KEY, &entries()).unwrap();
        assert!(out.starts_with(prefix));
        assert!(out.ends_with(suffix));
        assert_eq!(out.len(), prefix.len() + BLOCK.len() + suffix.len());
    }

    #[test]
    fn locate_reports_paren_offsets() {
        let text = "x=1\nsource=('a')\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.open..=span.close], "('a')");
    }

    #[test]
    fn quoted_parens_do_not_close() {
        let text = "source=('https://x/(weird)' \"a)b\" c\\)d)\ntail\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.close + 1..], "\ntail\n");
    }

    #[test]
    fn comment_inside_array_is_skipped() {
        let text = "source=(\n  'a' # old mirror (down)\n  'b'\n)\nend\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.close + 1..], "\nend\n");
    }

    #[test]
    fn hash_inside_word_is_not_a_comment() {
        let text = "source=(https://x/a#frag)\nend\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.open..=span.close], "(https://x/a#frag)");
    }

    #[test]
    fn nested_parens_are_balanced() {
        let text = "source=(\"$(printf x)\" 'y')\nend\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.close + 1..], "\nend\n");

        let unquoted = "source=($(echo a) b)\nend\n";
        let span = locate_array(unquoted, SOURCE_KEY).unwrap();
        assert_eq!(&unquoted[span.open..=span.close], "($(echo a) b)");
    }

    #[test]
    fn key_must_start_a_statement() {
        let text = "_source=('x')\nmysource=('y')\n";
        assert!(matches!(
            locate_array(text, SOURCE_KEY),
            Err(RecipeError::AnchorNotFound { .. })
        ));

        let text = "pkgrel=1; source=('y')\n";
        let span = locate_array(text, SOURCE_KEY).unwrap();
        assert_eq!(&text[span.open..=span.close], "('y')");
    }

    #[test]
    fn commented_anchor_is_skipped() {
        let text = "# source=('stale')\n  source=('live')\n";
        let out = patch_source_array(text, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, format!("# source=('stale')\n  source={BLOCK}\n"));
    }

    #[test]
    fn first_array_wins() {
        let text = "source=('one')\nsource=('two')\n";
        let out = patch_source_array(text, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, format!("source={BLOCK}\nsource=('two')\n"));
    }

    #[test]
    fn crlf_files_keep_crlf() {
        let text = "pkgname=x\r\nsource=(\r\n  'old'\r\n)\r\nend\r\n";
        let out = patch_source_array(text, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(
            out,
            format!("pkgname=x\r\nsource={}\r\nend\r\n", BLOCK.replace('\n', "\r\n"))
        );
        let again = patch_source_array(&out, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn unclosed_array_reports_line() {
        let text = "pkgname=x\n\nsource=(\n  'a'\n";
        let err = locate_array(text, SOURCE_KEY).unwrap_err();
        assert!(matches!(err, RecipeError::UnclosedArray { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn custom_key() {
        let text = "source=('keep')\nsource_x86_64=('old')\n";
        let out = patch_source_array(text, "source_x86_64", &entries()).unwrap();
        assert_eq!(out, format!("source=('keep')\nsource_x86_64={BLOCK}\n"));
    }

    #[test]
    fn render_quotes_single_quotes() {
        let entries = vec![SourceEntry {
            filename: "x".to_owned(),
            url: "https://r/it's".to_owned(),
        }];
        assert_eq!(render_array(&entries, "\n"), "(\n    'https://r/it'\\''s'\n)");
    }

    #[test]
    fn render_empty_list() {
        assert_eq!(render_array(&[], "\n"), "(\n)");
    }

    #[test]
    fn bytes_outside_array_need_not_be_utf8() {
        let mut text = b"# Maintainer: Jos\xe9 M\xfcller\npkgname=x\n".to_vec();
        text.extend_from_slice(b"source=('old')\nend\n");

        let out = patch_source_bytes(&text, SOURCE_KEY, &entries()).unwrap();
        let mut expected = b"# Maintainer: Jos\xe9 M\xfcller\npkgname=x\nsource=".to_vec();
        expected.extend_from_slice(BLOCK.as_bytes());
        expected.extend_from_slice(b"\nend\n");
        assert_eq!(out, expected);

        let again = patch_source_bytes(&out, SOURCE_KEY, &entries()).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn bytes_and_str_patching_agree() {
        let from_str = patch_source_array(PKGBUILD, SOURCE_KEY, &entries()).unwrap();
        let from_bytes = patch_source_bytes(PKGBUILD.as_bytes(), SOURCE_KEY, &entries()).unwrap();
        assert_eq!(from_str.as_bytes(), from_bytes.as_slice());
    }
}
