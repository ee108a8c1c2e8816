use super::session::write_entry;
use crate::presentation::formatters::{number, time};
use crate::presentation::view_models::{SplitListViewModel, SplitMergeViewModel};
use owo_colors::OwoColorize;
use std::fmt;

impl fmt::Display for SplitListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return writeln!(f, "No split sessions found.");
        }

        writeln!(f, "{} split group(s)", self.groups.len())?;
        for group in &self.groups {
            writeln!(f)?;
            let span = match (&group.first_timestamp, &group.last_timestamp) {
                (Some(first), Some(last)) => time::format_span(first, last),
                _ => None,
            };
            write!(
                f,
                "{} {} sessions, {}",
                group.tag.magenta().bold(),
                group.members.len(),
                number::format_bytes(group.total_bytes)
            )?;
            match span {
                Some(span) => writeln!(f, ", over {}", span)?,
                None => writeln!(f)?,
            }
            for member in &group.members {
                write!(f, "  ")?;
                write_entry(f, member, self.preview_chars)?;
            }
            writeln!(f, "  {}", group.suggested_command.cyan())?;
        }
        Ok(())
    }
}

impl fmt::Display for SplitMergeViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target directory: {}", self.target_dir)?;
        for group in &self.groups {
            writeln!(f)?;
            match (&group.merge, &group.error) {
                (Some(merge), _) => {
                    let verb = if self.dry_run { "would merge" } else { "merged" };
                    writeln!(
                        f,
                        "{} {} {} sessions → {}",
                        group.tag.magenta().bold(),
                        verb,
                        group.members.len(),
                        merge.target_id.yellow()
                    )?;
                    write!(f, "{}", merge)?;
                }
                (None, Some(error)) => {
                    writeln!(f, "{} {}", group.tag.magenta().bold(), "failed".red())?;
                    writeln!(f, "  {}", error)?;
                }
                (None, None) => {}
            }
        }
        Ok(())
    }
}
