use super::{Lines, SourceLine};

fn lines(src: &str) -> Vec<(u32, String)> {
    Lines::new(src)
        .map(|SourceLine { number, text }| (number, text))
        .collect()
}

fn owned(lines: &[(u32, &str)]) -> Vec<(u32, String)> {
    lines.iter().map(|&(n, s)| (n, s.to_owned())).collect()
}

#[test]
fn no_trailing_line() {
    assert_eq!(lines(""), owned(&[]));
    assert_eq!(lines("a\n"), owned(&[(1, "a")]));
    assert_eq!(lines("a\nb"), owned(&[(1, "a"), (2, "b")]));
    assert_eq!(lines("\n\n"), owned(&[(1, ""), (2, "")]));
}

#[test]
fn carriage_returns() {
    assert_eq!(lines("a\r\nb\r\n"), owned(&[(1, "a"), (2, "b")]));
}

#[test]
fn line_comment() {
    assert_eq!(
        lines("0 = 1// one\n// two\n0 !"),
        owned(&[(1, "0 = 1"), (2, ""), (3, "0 !")])
    );
}

#[test]
fn block_comment_keeps_numbering() {
    let mut it = Lines::new("0/*x*/= 1\n2 /* a\nb\nc */ !\n3");
    assert_eq!(it.next(), Some(SourceLine { number: 1, text: "0 = 1".into() }));
    assert_eq!(it.next(), Some(SourceLine { number: 2, text: "2  ".into() }));
    assert_eq!(it.next(), Some(SourceLine { number: 3, text: "".into() }));
    assert_eq!(it.next(), Some(SourceLine { number: 4, text: " !".into() }));
    assert_eq!(it.next(), Some(SourceLine { number: 5, text: "3".into() }));
    assert_eq!(it.next(), None);
    assert_eq!(it.unterminated_comment(), None);
}

#[test]
fn comment_markers_inside_block() {
    assert_eq!(lines("/* // */ 1 !"), owned(&[(1, "  1 !")]));
    assert_eq!(lines("/*/ 1 */2"), owned(&[(1, " 2")]));
}

#[test]
fn unterminated_block() {
    let mut it = Lines::new("1\n2 /* open\nstill\n");
    assert_eq!(it.by_ref().count(), 3);
    assert_eq!(it.unterminated_comment(), Some(2));
}
