use crate::presentation::formatters::{number, time};
use crate::presentation::view_models::MergeResultViewModel;
use owo_colors::OwoColorize;
use std::fmt;

impl fmt::Display for MergeResultViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "Sources (merge order):".bold())?;
        for (i, source) in self.sources.iter().enumerate() {
            let started = source
                .first_timestamp
                .as_deref()
                .map(time::format_local)
                .unwrap_or_else(|| "no timestamp".to_string());
            writeln!(
                f,
                "  {}. {} {:>9} {:>5} records  {}",
                i + 1,
                source.id.short().yellow(),
                number::format_bytes(source.size_bytes),
                source.record_count,
                started.bright_black()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Target:  {}", self.target_path)?;
        if let Some(title) = &self.title {
            writeln!(f, "Title:   {}", title.magenta())?;
        }
        if self.delete_sources {
            let verb = if self.status == "planned" { "would be" } else { "are" };
            writeln!(f, "Sources {} deleted after the write", verb)?;
        }

        if let Some(records) = self.records_written {
            writeln!(
                f,
                "Wrote:   {} records ({} messages), {} splices",
                records,
                self.message_count.unwrap_or_default(),
                self.splices.len()
            )?;
        }
        if !self.unlinked.is_empty() {
            writeln!(
                f,
                "{} {}",
                "Not linked (no trunk):".yellow(),
                self.unlinked.join(", ")
            )?;
        }
        if !self.sidechains.is_empty() {
            let renamed = self.sidechains.iter().filter(|c| c.renamed).count();
            writeln!(
                f,
                "Side files: {} copied, {} renamed",
                self.sidechains.len(),
                renamed
            )?;
        }
        if let Some(catalog) = &self.catalog {
            writeln!(f, "Catalog: {}", catalog)?;
        }
        if !self.deleted.is_empty() {
            writeln!(f, "Deleted: {} source(s)", self.deleted.len())?;
        }
        Ok(())
    }
}
