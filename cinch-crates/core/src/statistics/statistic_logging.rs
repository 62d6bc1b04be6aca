//! The global sink to which statistics are written, as lines of the form `PREFIX NAME=VALUE`
//! followed by an optional closing line.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

struct StatisticSink {
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticSink")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

impl StatisticSink {
    fn line(&self, name: impl Display, value: impl Display) -> String {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };

        format!("{} {name}={value}", self.prefix)
    }
}

static SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// Configures where and how statistics are written.
///
/// Only the first call has an effect. Without a writer, statistics go to stdout. Until this is
/// called, [`log_statistic`] discards everything it is given.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
}

fn with_sink(write: impl FnOnce(&mut StatisticSink)) {
    if let Some(sink) = SINK.get() {
        if let Ok(mut sink) = sink.lock() {
            write(&mut sink);
        }
    }
}

/// Writes the statistic `name` with `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let line = sink.line(name, value);
        let _ = writeln!(sink.writer, "{line}");
    });
}

/// Writes the closing line of a block of statistics, if one was configured.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(postfix) = sink.postfix {
            let _ = writeln!(sink.writer, "{postfix}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(casing: Option<Case>) -> StatisticSink {
        StatisticSink {
            prefix: "%% stat:",
            postfix: None,
            casing,
            writer: Box::new(std::io::sink()),
        }
    }

    #[test]
    fn names_are_written_as_given_without_casing() {
        assert_eq!(
            "%% stat: search_numDecisions=3",
            sink(None).line("search_numDecisions", 3)
        );
    }

    #[test]
    fn names_are_recased() {
        assert_eq!(
            "%% stat: searchNumDecisions=3",
            sink(Some(Case::Camel)).line("search_num_decisions", 3)
        );
    }
}
