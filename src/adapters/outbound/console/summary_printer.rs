use crate::application::dto::CurationResponse;
use crate::license_engine::domain::PolicyVerdict;
use owo_colors::OwoColorize;
use std::fmt::Write;

/// Renders the end-of-run summary shown on stderr after the report is written
pub struct SummaryPrinter;

impl SummaryPrinter {
    pub fn render(response: &CurationResponse) -> String {
        let summary = &response.summary;
        let mut out = String::new();

        let score = format!("{}%", summary.compliance_score);
        let score = match summary.compliance_score {
            90..=100 => score.green().bold().to_string(),
            50..=89 => score.yellow().bold().to_string(),
            _ => score.red().bold().to_string(),
        };
        let _ = writeln!(
            out,
            "📊 License compliance: {} ({}/{} approved)",
            score, summary.approved_count, summary.total_packages
        );
        let _ = writeln!(
            out,
            "   approved {} | conditional {} | forbidden {} | unknown {} | incompatible {}",
            summary.approved_count.green(),
            summary.conditional_count.yellow(),
            summary.forbidden_count.red(),
            summary.unknown_count.magenta(),
            summary.incompatible_count.red(),
        );

        for result in response
            .results
            .iter()
            .filter(|r| r.verdict.needs_alternative())
        {
            let label = match result.verdict {
                PolicyVerdict::Incompatible => "incompatible",
                _ => "forbidden",
            };
            let _ = writeln!(
                out,
                "   ❌ {} {}: {}",
                result.id,
                label.red(),
                result.resolved_expression
            );
        }

        if response.history_initialized {
            let _ = writeln!(
                out,
                "🗂  License history initialized with {} package(s)",
                summary.total_packages
            );
        } else {
            let critical = response.changes.iter().filter(|c| c.is_critical()).count();
            let changed = response.changes.iter().filter(|c| !c.is_new).count();
            let _ = writeln!(
                out,
                "🔔 License changes: {} ({} critical, {} new package(s))",
                changed,
                if critical > 0 {
                    critical.red().bold().to_string()
                } else {
                    critical.to_string()
                },
                response.changes.len() - changed
            );
        }

        let auto_apply = response.auto_apply().count();
        let _ = writeln!(
            out,
            "🛠  Curation suggestions: {} auto-apply, {} manual review",
            auto_apply.green(),
            (response.suggestions.len() - auto_apply).yellow()
        );

        if !response.warnings.is_empty() {
            let _ = writeln!(out, "⚠️  {} warning(s):", response.warnings.len());
            for warning in &response.warnings {
                let _ = writeln!(out, "   {}", warning.yellow());
            }
        }

        out
    }
}
