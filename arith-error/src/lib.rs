//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::Debug, io, ops::Range};

// lets `#[derive(ErrorKind)]` refer to this crate by name in this crate's own tests
#[cfg(test)]
extern crate self as arith_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so that callers can inspect the concrete kind of error.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns true if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns the kind of this error as `K`, if it is one.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr, highlighting the given source code.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }

    /// Render this error into a byte buffer, highlighting the given source code.
    pub fn report_to_vec(&self, src_id: &str, input: &str) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.build_report(src_id).write((src_id, Source::from(input)), &mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use arith_attrs::ErrorKind;
    use super::*;

    /// A stand-in error kind pointing at a single span.
    #[derive(Debug, ErrorKind)]
    #[error(
        message = "something went wrong",
        labels = ["right here"],
        help = "try something else",
    )]
    struct Oops;

    /// A stand-in error kind with a field.
    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("`{}` is not allowed", symbol),
        labels = ["this symbol"],
    )]
    struct Forbidden {
        symbol: char,
    }

    /// A stand-in error kind with only a message, pointing at two spans.
    #[derive(Debug, ErrorKind)]
    #[error(message = "bare message")]
    struct Bare;

    /// A stand-in error kind with one label per span.
    #[derive(Debug, ErrorKind)]
    #[error(message = "mismatched pair", labels = ["opened here", "closed here"])]
    struct Pair;

    fn render(err: &Error, input: &str) -> String {
        let buf = err.report_to_vec("input", input).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new(vec![0..1], Oops);
        assert!(err.is::<Oops>());
        assert!(!err.is::<Forbidden>());
        assert!(err.downcast_ref::<Forbidden>().is_none());
    }

    #[test]
    fn downcast_kind_with_fields() {
        let err = Error::new(vec![2..3], Forbidden { symbol: '-' });
        let kind = err.downcast_ref::<Forbidden>().unwrap();
        assert_eq!(kind.symbol, '-');
    }

    #[test]
    fn report_contains_message_label_and_help() {
        let err = Error::new(vec![4..5], Oops);
        let report = render(&err, "1 + $");

        assert!(report.contains("something went wrong"));
        assert!(report.contains("right here"));
        assert!(report.contains("try something else"));
    }

    #[test]
    fn report_formats_fields() {
        let err = Error::new(vec![2..3], Forbidden { symbol: '-' });
        let report = render(&err, "x - y");

        assert!(report.contains("`-` is not allowed"));
        assert!(report.contains("this symbol"));
    }

    #[test]
    fn report_without_labels_or_help() {
        let err = Error::new(vec![0..1, 4..5], Bare);
        let report = render(&err, "1 + $");

        assert!(report.contains("bare message"));
        assert!(!report.contains("Help"));
    }

    #[test]
    fn report_pairs_labels_with_spans() {
        let err = Error::new(vec![0..1, 4..5], Pair);
        let report = render(&err, "( + )");

        assert!(report.contains("opened here"));
        assert!(report.contains("closed here"));
    }
}
