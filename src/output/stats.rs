//! Human-readable crawl summaries

use crate::output::CrawlReport;

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!(
        "  Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Duration: {:.2}s", report.elapsed.as_secs_f64());
    println!("  Links expanded: {}", report.links_expanded);
    println!(
        "  Files retrieved: {} ({} fetched, {} from cache)",
        report.retrieved.len(),
        report.pages_fetched(),
        report.cache_hits
    );
    println!();

    if !report.failures.is_empty() {
        println!("Abandoned Branches ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.link, failure.error);
        }
        println!();
    }

    let rate = if report.elapsed.as_secs_f64() > 0.0 {
        report.links_expanded as f64 / report.elapsed.as_secs_f64()
    } else {
        0.0
    };
    println!("Rate: {:.2} pages/sec", rate);
}
