//! Output rendering and formatting

use artsync_ops::SyncReport;
use artsync_types::ColorChoice;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io;

/// Output renderer for the final report
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
        }
    }

    /// Render the final report
    pub fn render_report(&self, report: &SyncReport) -> io::Result<()> {
        if self.json_output {
            self.render_json(report)
        } else {
            self.render_table(report)
        }
    }

    /// Render as JSON
    fn render_json(&self, report: &SyncReport) -> io::Result<()> {
        let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as formatted table plus summary lines
    fn render_table(&self, report: &SyncReport) -> io::Result<()> {
        if report.up_to_date {
            println!("All packages are up to date.");
            return Ok(());
        }

        let colors = self.colors_enabled();
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Project", "Cluster", "Needed update", "Updated"]);

        for package in &report.packages {
            for outcome in &package.clusters {
                let updated = match (outcome.needed_update, outcome.updated) {
                    (false, _) => Cell::new("-"),
                    (true, Some(true)) => {
                        let cell = Cell::new("yes");
                        if colors {
                            cell.fg(Color::Green)
                        } else {
                            cell
                        }
                    }
                    (true, Some(false)) => {
                        let cell = Cell::new("NO");
                        if colors {
                            cell.fg(Color::Red)
                        } else {
                            cell
                        }
                    }
                    (true, None) => Cell::new("not attempted"),
                };

                table.add_row(vec![
                    Cell::new(&package.project),
                    Cell::new(&outcome.cluster),
                    Cell::new(if outcome.needed_update { "yes" } else { "no" }),
                    updated,
                ]);
            }
        }

        println!("{table}");

        for package in &report.packages {
            for outcome in &package.clusters {
                if !outcome.needed_update {
                    continue;
                }
                if outcome.updated == Some(true) {
                    println!(
                        "{}: {} was updated successfully",
                        package.project, outcome.cluster
                    );
                } else {
                    println!(
                        "{}: {} was NOT updated successfully",
                        package.project, outcome.cluster
                    );
                }
            }
        }

        Ok(())
    }

    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}
