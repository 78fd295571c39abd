use std::path::Path;

use gridlogo::{interpret, Span};

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

// The expected text of a failure is the error kind, optionally followed by the
// line and column it should be reported at.
fn parse_failure(s: &str) -> (String, Option<(u32, usize)>) {
    let mut split = s.split_whitespace();
    let kind = split.next().unwrap().to_owned();
    let loc = split.next().map(|line| {
        let column = split.next().unwrap().parse().unwrap();
        (line.parse().unwrap(), column)
    });
    (kind, loc)
}

impl TestCase {
    fn exec(&self) {
        let out = interpret(&self.input)
            .unwrap_or_else(|e| panic!("{:?} failed: {e}", self.input));
        assert_eq!(out, self.expected, "{:?}", self.input);
    }

    fn exec_failure(&self) {
        let err = interpret(&self.input).unwrap_err();
        let (kind, loc) = parse_failure(&self.expected);
        assert_eq!(format!("{:?}", err.kind()), kind, "{:?}", self.input);
        assert_eq!(
            err.span().map(|Span { line, column, .. }| (line, column)),
            loc,
            "{:?}",
            self.input
        );
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn text_tests() {
    let tests = read_tests("tests/basic.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.exec();
    }
}

#[test]
fn exec_failures() {
    let tests = read_tests("tests/exec-failures.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.exec_failure();
    }
}
