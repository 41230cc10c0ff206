//! Event handling and progress display

use artsync_events::Event;
use console::style;

/// Renders pipeline events as status lines on the terminal
pub struct EventHandler {
    colors: bool,
    debug: bool,
    /// Suppress all event output (JSON mode keeps stdout machine-readable)
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors: bool, debug: bool, quiet: bool) -> Self {
        Self {
            colors,
            debug,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: Event) {
        if self.quiet {
            return;
        }

        match event {
            Event::ProjectsDiscovered { projects } => {
                self.show_status(&format!("Starting projects: {}", projects.join(", ")));
            }

            Event::PackageValidated { project } => {
                self.show_status(&format!("{project} is valid"));
            }
            Event::PackageInvalid { project, reason } => {
                self.show_error(&format!("{project} is not valid: {reason}"));
            }

            Event::ClusterStale { project, cluster } => {
                self.show_status(&format!("{project}: needs update in {cluster}"));
            }
            Event::ClusterCurrent { project, cluster } => {
                self.show_status(&format!("{project}: up to date in {cluster}"));
            }

            Event::DownloadStarted { project, url } => {
                self.show_status(&format!("Downloading {url} for {project}"));
            }
            Event::DownloadCompleted { project, bytes } => {
                self.show_status(&format!("{bytes} bytes downloaded for {project}"));
            }
            Event::DownloadFailed {
                project, reason, ..
            } => {
                self.show_error(&format!("Download failed for {project}: {reason}"));
            }

            Event::UploadStarted { project, cluster } => {
                self.show_status(&format!("{project}: uploading to {cluster}"));
            }
            Event::UploadCompleted { project, cluster } => {
                self.show_status(&format!("{project}: {cluster} updated"));
            }
            Event::UploadFailed {
                project,
                cluster,
                reason,
            } => {
                self.show_error(&format!("{project}: update in {cluster} failed: {reason}"));
            }

            Event::OperationStarted { operation } => {
                self.show_status(&operation);
            }
            Event::OperationCompleted { operation, success } => {
                if success {
                    self.show_status(&format!("{operation} completed"));
                } else {
                    self.show_error(&format!("{operation} completed with failures"));
                }
            }

            Event::Warning { message } => {
                self.show_warning(&message);
            }
            Event::DebugLog { message } => {
                if self.debug {
                    eprintln!("{message}");
                }
            }
        }
    }

    fn show_status(&self, message: &str) {
        println!("{message}");
    }

    fn show_warning(&self, message: &str) {
        if self.colors {
            eprintln!("{}", style(message).yellow());
        } else {
            eprintln!("{message}");
        }
    }

    fn show_error(&self, message: &str) {
        if self.colors {
            eprintln!("{}", style(message).red());
        } else {
            eprintln!("{message}");
        }
    }
}
