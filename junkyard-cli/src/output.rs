//! Report rendering for `--output text|json`
//!
//! Command handlers build a report value and hand it to [`OutputWriter`];
//! they never look at the selected format themselves. Reports go to stdout,
//! tracing output goes to stderr.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes command reports in the format chosen by `--output`.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// ```no_run
    /// use junkyard_cli::cli::OutputFormat;
    /// use junkyard_cli::output::OutputWriter;
    ///
    /// let writer = OutputWriter::new(OutputFormat::Json);
    /// ```
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Writes `report` to a locked stdout.
    pub fn render<T: Render + Serialize>(&self, report: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.render_to(report, &mut out)
    }

    /// Writes `report` to `out`: text through [`Render`], JSON pretty-printed
    /// with a trailing newline.
    pub fn render_to<T: Render + Serialize>(
        &self,
        report: &T,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => report.render_text(out)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, report)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Human-readable form of a report. Every report also derives `Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Truncates `s` to `max` characters, marking the cut with `~`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct LotReport {
        lot: String,
        vehicles: u32,
    }

    impl Render for LotReport {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Lot {} holds {} vehicles", self.lot, self.vehicles)
        }
    }

    fn report() -> LotReport {
        LotReport {
            lot: "north".to_owned(),
            vehicles: 12,
        }
    }

    #[test]
    fn test_text_goes_through_render() {
        let mut buffer = Vec::new();
        OutputWriter::new(OutputFormat::Text)
            .render_to(&report(), &mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert_eq!(output, "Lot north holds 12 vehicles\n");
    }

    #[test]
    fn test_json_is_pretty_and_newline_terminated() {
        let mut buffer = Vec::new();
        OutputWriter::new(OutputFormat::Json)
            .render_to(&report(), &mut buffer)
            .expect("json rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.ends_with("}\n"));
        assert!(output.contains("\n  \"lot\": \"north\""));
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["vehicles"].as_u64(), Some(12));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("battery", 10), "battery");
        assert_eq!(truncate("headlight!", 10), "headlight!");
        assert_eq!(truncate("transfer case", 8), "transfe~");
        assert_eq!(truncate("ÉÉÉÉ", 3), "ÉÉ~");
    }
}
