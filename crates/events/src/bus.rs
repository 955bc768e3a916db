use super::models::{AppEvent, EventBus};
use colored::Colorize;
use netweather_models::{ProgressSnapshot, ScanStatistics, UrlResult, UNKNOWN_VERSION};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

impl EventBus {
    pub fn new(verbose: bool) -> Arc<Self> {
        Arc::new(Self {
            verbose: AtomicBool::new(verbose),
        })
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    pub fn emit(&self, event: AppEvent) {
        let verbose = self.is_verbose();

        match event {
            // Application lifecycle
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "NetWeather - URL Scanner".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Shutdown => {
                tracing::info!("Application finished");
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { workers, use_db } => {
                let storage = if use_db { "storage on" } else { "storage off" };
                println!(
                    "  {} {} worker(s), {}",
                    "✓".green(),
                    workers.to_string().cyan(),
                    storage.dimmed()
                );
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigMigrated { added_fields } => {
                if !added_fields.is_empty() {
                    println!(
                        "  {} Config updated: added {}",
                        "↻".blue(),
                        added_fields.join(", ").dimmed()
                    );
                }
            }

            // Inputs & storage
            AppEvent::UrlListLoaded { path, count } => {
                println!("  {} {} URL(s) from {}", "✓".green(), count.to_string().cyan(), path.dimmed());
            }
            AppEvent::StorageReady { backend } => {
                println!("  {} Storage backend: {}", "✓".green(), backend.cyan());
            }

            // Run
            AppEvent::RunStarted { total, workers } => {
                tracing::info!("Starting parallel processing with {} workers", workers);
                if !verbose {
                    println!("Processing {} URLs with {} workers...", total, workers);
                    print!("Progress: ");
                    flush();
                }
            }
            AppEvent::UrlProcessed { result, progress } => {
                if verbose {
                    print_result_detail(&result);
                } else {
                    print_progress(&result, &progress);
                }
            }
            AppEvent::RunFinished { progress, methods } => {
                print_summary(&progress);
                if !methods.is_empty() {
                    println!("Identified by:");
                    for (method, count) in methods {
                        println!("  {:<20} {}", method.as_str(), count.to_string().cyan());
                    }
                }
            }
            AppEvent::RunCancelled { progress } => {
                println!(
                    "\n\n{} Scan cancelled after {}/{} URLs",
                    "✗".red(),
                    progress.processed,
                    progress.total
                );
            }

            // Stored results
            AppEvent::Statistics { stats } => {
                print_statistics(&stats);
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}

fn flush() {
    let _ = std::io::stdout().flush();
}

fn print_progress(result: &UrlResult, progress: &ProgressSnapshot) {
    if result.is_scanned() {
        print!(
            "\n[{}/{}] Scanning: {} → {} scripts found",
            progress.processed,
            progress.total,
            result.scanned_url().cyan(),
            result.scan_results.len()
        );
        print!("\nProgress: ");
    }

    if progress.processed % 10 == 0 || progress.processed == progress.total {
        print!(" {}", progress.processed);
    } else {
        print!(".");
    }
    flush();
}

fn print_result_detail(result: &UrlResult) {
    println!("\nProcessing URL: {}", result.job.url.cyan());

    if result.excluded {
        println!("  - Skipping excluded URL (excluded domain)");
        return;
    }
    if let Some(error) = &result.error {
        println!("  - {} {}", "Error checking reachability:".red(), error);
        return;
    }
    let Some(reachability) = &result.reachability else {
        return;
    };
    if !reachability.is_reachable() {
        println!("  - {}", "URL not reachable".red());
        return;
    }

    let mut protocols = Vec::new();
    if reachability.http_available {
        protocols.push(format!("HTTP ({})", status_text(reachability.http_status)));
    }
    if reachability.https_available {
        protocols.push(format!("HTTPS ({})", status_text(reachability.https_status)));
    }
    println!("  - Reachable via: {}", protocols.join(", "));

    if reachability.has_redirect() {
        println!("  - Redirects detected");
    }
    if let Some(final_url) = &reachability.final_url {
        if final_url != &result.job.url {
            println!("  - Final URL: {}", final_url);
        }
    }

    if result.skipped {
        println!("  - {}", "Skipping JavaScript scan (no HTTP 200 response)".yellow());
        return;
    }

    println!("  - Scanning for JavaScript libraries...");
    for scan in &result.scan_results {
        if scan.library_version.is_empty() || scan.library_version == UNKNOWN_VERSION {
            println!(
                "    Library: {} ({}) [{}...]",
                scan.library_name.green(),
                scan.identified_by,
                scan.short_checksum()
            );
        } else {
            println!(
                "    Library: {} v{} ({}) [{}...]",
                scan.library_name.green(),
                scan.library_version,
                scan.identified_by,
                scan.short_checksum()
            );
        }
    }
}

fn print_summary(progress: &ProgressSnapshot) {
    println!("\n\n{}", "Scan completed!".green().bold());
    println!("Total URLs processed: {}", progress.processed);
    println!("Successfully scanned: {}", progress.scanned);
    if progress.excluded > 0 {
        println!("Excluded URLs: {}", progress.excluded);
    }
    if progress.skipped > 0 {
        println!("Skipped (non-200): {}", progress.skipped);
    }
    if progress.errored > 0 {
        println!("Errors/Unreachable: {}", progress.errored);
    }
}

fn print_statistics(stats: &ScanStatistics) {
    const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    println!("\n{}\n", "=== NetWeather Statistics ===".white().bold());
    println!("Total URLs scanned: {}", stats.total_urls);
    println!("Total scripts found: {}", stats.total_scripts);
    println!("Unique libraries identified: {}", stats.unique_libraries);
    if let Some(first) = stats.first_scan {
        println!("First scan: {}", first.format(TIME_FORMAT));
    }
    if let Some(last) = stats.last_scan {
        println!("Last scan: {}", last.format(TIME_FORMAT));
    }

    println!("\n{}", "=== Library Usage ===".white().bold());
    if stats.libraries.is_empty() {
        println!("No libraries found in the result store.");
    } else {
        println!();
        for library in &stats.libraries {
            let checksum = match library.checksum.get(..8) {
                Some(prefix) => format!("{}...", prefix),
                None => library.checksum.clone(),
            };
            if library.version.is_empty() || library.version == UNKNOWN_VERSION {
                println!(
                    "{} [{:>11}]: {} occurrences ({})",
                    format!("{:<35}", library.name).green(),
                    checksum,
                    library.count,
                    library.identified_by
                );
            } else {
                println!(
                    "{} v{:<8} [{:>11}]: {} occurrences ({})",
                    format!("{:<25}", library.name).green(),
                    library.version,
                    checksum,
                    library.count,
                    library.identified_by
                );
            }
        }
    }

    println!("\n{}", "=== Recent Scans ===".white().bold());
    if stats.recent_scans.is_empty() {
        println!("No recent scans found.");
    } else {
        println!();
        for scan in &stats.recent_scans {
            println!("{} - {}", scan.scanned_at.format(TIME_FORMAT), scan.url.cyan());
        }
    }

    let reachability = &stats.reachability;
    println!("\n{}", "=== URL Reachability ===".white().bold());
    if reachability.total_checked == 0 {
        println!("No URL reachability data found.");
    } else {
        println!();
        println!("Total URLs checked: {}", reachability.total_checked);
        println!("HTTP only: {}", reachability.http_only);
        println!("HTTPS only: {}", reachability.https_only);
        println!("Both HTTP & HTTPS: {}", reachability.both_protocols);
        println!("Unreachable: {}", reachability.unreachable);
        println!("URLs with redirects: {}", reachability.with_redirects);
    }
}

fn status_text(status: Option<u16>) -> String {
    status.map_or_else(|| "-".to_string(), |s| s.to_string())
}
