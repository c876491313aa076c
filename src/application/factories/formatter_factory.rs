use crate::adapters::outbound::formatters::{CurationsFormatter, JsonReportFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for an output format. It belongs in the
/// application layer as it maps an application-level choice onto adapters.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use license_curator::application::dto::OutputFormat;
    /// use license_curator::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonReportFormatter::new()),
            OutputFormat::Curations => Box::new(CurationsFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use license_curator::application::dto::OutputFormat;
    /// use license_curator::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Curations);
    /// assert_eq!(message, "📝 Generating ORT curations output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON run report...",
            OutputFormat::Curations => "📝 Generating ORT curations output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::formatters::test_support::sample_response;

    #[test]
    fn test_json_formatter_renders_report() {
        let output = FormatterFactory::create(OutputFormat::Json)
            .format(&sample_response())
            .unwrap();
        assert!(output.trim_start().starts_with('{'));
        assert!(output.contains("\"autoApply\""));
    }

    #[test]
    fn test_curations_formatter_renders_yaml_list() {
        let output = FormatterFactory::create(OutputFormat::Curations)
            .format(&sample_response())
            .unwrap();
        assert!(output.contains("concluded_license"));
        assert!(!output.contains("autoApply"));
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Json),
            "📝 Generating JSON run report..."
        );
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Curations),
            "📝 Generating ORT curations output..."
        );
    }
}
