use crate::presentation::formatters::{number, text, time};
use crate::presentation::view_models::{SessionDetailViewModel, SessionListEntry, SessionListViewModel};
use owo_colors::OwoColorize;
use std::fmt;

pub(crate) fn write_entry(f: &mut fmt::Formatter<'_>, entry: &SessionListEntry, preview_chars: usize) -> fmt::Result {
    let when = entry
        .last_timestamp
        .as_deref()
        .map(time::format_relative_time)
        .unwrap_or_else(|| "unknown".to_string());

    let snippet = text::normalize_and_clean(entry.preview.as_deref().unwrap_or(""), preview_chars);
    let snippet = if snippet.is_empty() {
        format!("{}", "[empty]".bright_black())
    } else {
        snippet
    };

    write!(
        f,
        "{:>14} {} {:>5} msgs {:>9}",
        when.bright_black(),
        entry.id.short().yellow(),
        entry.message_count,
        number::format_bytes(entry.size_bytes),
    )?;
    if let Some(tag) = &entry.group_tag {
        write!(f, " {}", format!("[{}]", tag).magenta())?;
    }
    writeln!(f, " {}", snippet)
}

impl fmt::Display for SessionListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sessions.is_empty() {
            writeln!(f, "No sessions found.")?;
            if let Some(project) = &self.project_filter {
                writeln!(f, "Project filter: {}", project)?;
            }
            return Ok(());
        }

        for entry in &self.sessions {
            write_entry(f, entry, self.preview_chars)?;
        }

        if self.total_count > self.sessions.len() {
            writeln!(
                f,
                "{}",
                format!(
                    "... {} more (use --limit to show more)",
                    self.total_count - self.sessions.len()
                )
                .bright_black()
            )?;
        }
        if let Some(project) = &self.project_filter {
            writeln!(f)?;
            writeln!(f, "Project: {}", project)?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionDetailViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "Session".bold(), self.id.yellow())?;
        writeln!(f, "  Path:       {}", self.path)?;
        if let Some(root) = &self.project_root {
            writeln!(f, "  Project:    {}", root)?;
        }
        if let Some(tag) = &self.group_tag {
            writeln!(f, "  Title:      {}", tag.magenta())?;
        }
        writeln!(f, "  Size:       {}", number::format_bytes(self.size_bytes))?;
        writeln!(
            f,
            "  Records:    {} ({} messages, {} malformed lines)",
            self.record_count, self.message_count, self.malformed_lines
        )?;
        if let (Some(first), Some(last)) = (&self.first_timestamp, &self.last_timestamp) {
            let span = time::format_span(first, last).unwrap_or_default();
            writeln!(
                f,
                "  Time:       {} → {} ({})",
                time::format_local(first),
                time::format_local(last),
                span
            )?;
        }
        if let Some(preview) = &self.preview {
            writeln!(f, "  First:      {}", text::normalize_and_clean(preview, 80))?;
        }

        writeln!(f)?;
        writeln!(f, "{}", "Trunk".bold())?;
        match &self.trunk {
            Some(trunk) => {
                writeln!(f, "  Root:       {}", trunk.root)?;
                writeln!(f, "  Leaf:       {}", trunk.leaf)?;
                writeln!(f, "  Length:     {} of {} records", trunk.length, self.identified_records)?;
            }
            None => writeln!(f, "  {}", "none (no record carries an id)".red())?,
        }
        writeln!(f, "  Roots:      {}", self.roots)?;
        writeln!(f, "  Branches:   {}", self.branches)?;
        if self.dangling_parents > 0 {
            writeln!(f, "  Dangling:   {} parent references leave the file", self.dangling_parents)?;
        }
        if self.cycle_detected {
            writeln!(f, "  {}", "Cycle detected in parent references".red())?;
        }

        if !self.sidechain_files.is_empty() {
            writeln!(f)?;
            writeln!(f, "{} ({})", "Side files".bold(), self.sidechain_files.len())?;
            for file in &self.sidechain_files {
                writeln!(f, "  {}", file)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "{} ({})", "Parse warnings".yellow().bold(), self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }
        Ok(())
    }
}
