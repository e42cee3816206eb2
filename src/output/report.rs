use crate::output::CrawlSummary;

/// Renders a crawl summary as a human-readable report
pub fn format_summary(summary: &CrawlSummary) -> String {
    format!(
        "=== Crawl Summary ===\n\n\
         Start URL: {start_url}\n\
         Outcome: {outcome}\n\
         Started: {started}\n\
         Duration: {duration:.3}s\n\n\
         Requests:\n\
         \x20 Dispatched: {dispatched}\n\
         \x20 Completed: {completed}\n\
         \x20 Rate: {rate:.2} pages/sec\n\n\
         URLs:\n\
         \x20 Known: {known}\n\
         \x20 Visited: {visited}\n\
         \x20 Left in frontier: {remaining}\n",
        start_url = summary.start_url,
        outcome = summary.outcome,
        started = summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        duration = summary.duration().num_milliseconds() as f64 / 1000.0,
        dispatched = summary.dispatched,
        completed = summary.completed,
        rate = summary.pages_per_second(),
        known = summary.urls_known,
        visited = summary.urls_visited,
        remaining = summary.frontier_remaining,
    )
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
