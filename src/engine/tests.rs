use super::*;
use crate::args::test_support::parse_test_args;
use crate::args::HttpMethod;
use crate::error::{AppError, AppResult, HttpError};
use crate::http::Transport;
use crate::metrics::{AggregateStats, Aggregator};
use crate::shutdown::shutdown_channel;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use url::Url;
use reqwest::header::HeaderName;
use std::collections::HashSet;
use std::future::Future;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const IDENTITIES: [&str; 3] = ["agent-alpha", "agent-beta", "agent-gamma"];

fn run_paused_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn run_config(duration: Duration, think: ThinkTime) -> AppResult<RunConfig> {
    let target = Url::parse("http://127.0.0.1:9/")
        .map_err(|err| AppError::validation(format!("Bad test URL: {}", err)))?;
    Ok(RunConfig {
        target,
        method: HttpMethod::Get,
        duration,
        concurrency: 1,
        think,
        identities: IdentityCatalog::new(IDENTITIES)?,
        identity_header: HeaderName::from_static("user-agent"),
        request_timeout: Duration::from_secs(10),
        connect_timeout: Duration::from_secs(5),
        max_requests: None,
    })
}

fn fixed_think(millis: u64) -> AppResult<ThinkTime> {
    let pause = Duration::from_millis(millis);
    Ok(ThinkTime::new(pause, pause)?)
}

/// Answers after a fixed delay and remembers which identities it saw.
#[derive(Clone, Default)]
struct FakeTransport {
    delay: Duration,
    status: u16,
    fail_every: Option<u64>,
    calls: Arc<AtomicU64>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    fn ok(delay: Duration) -> Self {
        Self {
            delay,
            status: 200,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, identity: &Identity) -> Result<u16, HttpError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(identity.as_str().to_owned());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(every) = self.fail_every
            && call.checked_rem(every) == Some(0)
        {
            return Err(HttpError::TestExpectation {
                message: "connection refused",
            });
        }
        Ok(self.status)
    }
}

/// Every request fails before reaching the wire.
struct UnbuildableTransport;

#[async_trait]
impl Transport for UnbuildableTransport {
    async fn send(&self, _identity: &Identity) -> Result<u16, HttpError> {
        match reqwest::Client::new().get("not a url").build() {
            Ok(_) => Ok(200),
            Err(err) => Err(HttpError::BuildRequest { source: err }),
        }
    }
}

async fn run_with<T: Transport>(
    config: RunConfig,
    transports: Vec<T>,
) -> AppResult<(AggregateStats, RunTiming)> {
    let aggregator = Arc::new(Aggregator::new());
    let (shutdown_tx, _) = shutdown_channel();
    let timing = run_scheduler(&Arc::new(config), transports, &aggregator, None, &shutdown_tx).await?;
    Ok((aggregator.snapshot(), timing))
}

fn check_consistent(stats: &AggregateStats) -> AppResult<()> {
    if !stats.is_consistent() {
        return Err(AppError::validation(format!(
            "Counters out of balance: {:?}",
            stats
        )));
    }
    Ok(())
}

#[test]
fn zero_workers_complete_immediately() -> AppResult<()> {
    run_paused_test(async {
        let config = run_config(Duration::from_secs(5), ThinkTime::NONE)?;
        let (stats, timing) = run_with(config, Vec::<FakeTransport>::new()).await?;
        if stats.total != 0 || timing.requests != 0 {
            return Err(AppError::validation("Expected no requests without workers"));
        }
        if !timing.wall_clock.is_zero() {
            return Err(AppError::validation(format!(
                "Expected zero wall clock, got {:?}",
                timing.wall_clock
            )));
        }
        Ok(())
    })
}

#[test]
fn zero_duration_issues_no_requests() -> AppResult<()> {
    run_paused_test(async {
        let transport = FakeTransport::ok(Duration::ZERO);
        let calls = Arc::clone(&transport.calls);
        let config = run_config(Duration::ZERO, ThinkTime::NONE)?;
        let (stats, _) = run_with(config, vec![transport.clone(), transport]).await?;
        if stats.total != 0 || calls.load(Ordering::Relaxed) != 0 {
            return Err(AppError::validation("Expected no requests for zero duration"));
        }
        Ok(())
    })
}

#[test]
fn fixed_think_time_paces_each_worker() -> AppResult<()> {
    run_paused_test(async {
        let transports = vec![FakeTransport::ok(Duration::ZERO); 3];
        let config = run_config(Duration::from_secs(1), fixed_think(250)?)?;
        let (stats, timing) = run_with(config, transports).await?;
        // Requests start at 0, 250, 500 and 750 ms on every worker.
        if stats.total != 12 || timing.requests != 12 {
            return Err(AppError::validation(format!(
                "Expected 12 requests, got {} recorded and {} issued",
                stats.total, timing.requests
            )));
        }
        if stats.success_count != 12 {
            return Err(AppError::validation("Expected every request to succeed"));
        }
        check_consistent(&stats)
    })
}

#[test]
fn in_flight_request_finishes_past_deadline() -> AppResult<()> {
    run_paused_test(async {
        let delay = Duration::from_millis(300);
        let duration = Duration::from_secs(1);
        let config = run_config(duration, ThinkTime::NONE)?;
        let (stats, timing) = run_with(config, vec![FakeTransport::ok(delay)]).await?;
        // Starts at 0, 300, 600 and 900 ms; the last one completes at 1.2 s.
        if stats.total != 4 {
            return Err(AppError::validation(format!(
                "Expected 4 requests, got {}",
                stats.total
            )));
        }
        let upper = duration
            .saturating_add(delay)
            .saturating_add(Duration::from_millis(50));
        if timing.wall_clock < duration || timing.wall_clock > upper {
            return Err(AppError::validation(format!(
                "Wall clock {:?} outside [{:?}, {:?}]",
                timing.wall_clock, duration, upper
            )));
        }
        if stats.latency_count != 4 || stats.latency_sum < delay.saturating_mul(4) {
            return Err(AppError::validation(format!(
                "Unexpected latency totals: {:?}",
                stats
            )));
        }
        Ok(())
    })
}

#[test]
fn think_time_is_clipped_at_deadline() -> AppResult<()> {
    run_paused_test(async {
        let duration = Duration::from_secs(1);
        let config = run_config(duration, fixed_think(10_000)?)?;
        let (stats, timing) = run_with(config, vec![FakeTransport::ok(Duration::ZERO)]).await?;
        if stats.total != 1 {
            return Err(AppError::validation("Expected a single request"));
        }
        if timing.wall_clock > duration.saturating_add(Duration::from_millis(50)) {
            return Err(AppError::validation(format!(
                "Think time overran the deadline: {:?}",
                timing.wall_clock
            )));
        }
        Ok(())
    })
}

#[test]
fn failures_are_counted_and_workers_keep_going() -> AppResult<()> {
    run_paused_test(async {
        let transport = FakeTransport {
            fail_every: Some(2),
            ..FakeTransport::ok(Duration::from_millis(10))
        };
        let config = run_config(Duration::from_secs(1), fixed_think(90)?)?;
        let (stats, _) = run_with(config, vec![transport]).await?;
        if stats.failure_count == 0 || stats.success_count == 0 {
            return Err(AppError::validation(format!(
                "Expected a mix of outcomes: {:?}",
                stats
            )));
        }
        if stats.total < 5 {
            return Err(AppError::validation("A failure stopped the worker"));
        }
        if stats.latency_count != stats.total {
            return Err(AppError::validation(
                "Transport failures must contribute latency",
            ));
        }
        check_consistent(&stats)
    })
}

#[test]
fn non_ok_status_is_a_failure() -> AppResult<()> {
    run_paused_test(async {
        let transport = FakeTransport {
            status: 503,
            ..FakeTransport::ok(Duration::ZERO)
        };
        let config = run_config(Duration::from_secs(1), fixed_think(500)?)?;
        let (stats, _) = run_with(config, vec![transport]).await?;
        if stats.total != 2 || stats.failure_count != 2 || stats.latency_count != 2 {
            return Err(AppError::validation(format!(
                "Unexpected counters for 503 responses: {:?}",
                stats
            )));
        }
        Ok(())
    })
}

#[test]
fn unbuildable_requests_have_no_latency() -> AppResult<()> {
    run_paused_test(async {
        let config = run_config(Duration::from_secs(1), fixed_think(500)?)?;
        let (stats, _) = run_with(config, vec![UnbuildableTransport]).await?;
        if stats.total != 2 || stats.failure_count != 2 {
            return Err(AppError::validation(format!(
                "Unexpected counters: {:?}",
                stats
            )));
        }
        if stats.latency_count != 0 || !stats.latency_sum.is_zero() {
            return Err(AppError::validation(
                "Unbuildable requests must not contribute latency",
            ));
        }
        Ok(())
    })
}

#[test]
fn request_cap_is_shared_by_workers() -> AppResult<()> {
    run_paused_test(async {
        let transports = vec![FakeTransport::ok(Duration::from_millis(5)); 4];
        let mut config = run_config(Duration::from_secs(30), fixed_think(10)?)?;
        config.max_requests = Some(7);
        let (stats, timing) = run_with(config, transports).await?;
        if stats.total != 7 || timing.requests != 7 {
            return Err(AppError::validation(format!(
                "Expected exactly 7 requests, got {}",
                stats.total
            )));
        }
        if timing.wall_clock >= Duration::from_secs(30) {
            return Err(AppError::validation("Workers kept running after the cap"));
        }
        Ok(())
    })
}

#[test]
fn shutdown_stops_workers_early() -> AppResult<()> {
    run_paused_test(async {
        let aggregator = Arc::new(Aggregator::new());
        let (shutdown_tx, _) = shutdown_channel();
        let config = Arc::new(run_config(Duration::from_secs(60), fixed_think(100)?)?);
        let transports = vec![FakeTransport::ok(Duration::from_millis(20)); 2];

        let trigger = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(trigger.send(()));
        });

        let timing = run_scheduler(&config, transports, &aggregator, None, &shutdown_tx).await?;
        let stats = aggregator.snapshot();
        if timing.wall_clock >= Duration::from_secs(2) {
            return Err(AppError::validation(format!(
                "Shutdown was not honoured: {:?}",
                timing.wall_clock
            )));
        }
        if stats.total == 0 || stats.total != timing.requests {
            return Err(AppError::validation(format!(
                "Unexpected partial results: {:?}",
                stats
            )));
        }
        check_consistent(&stats)
    })
}

#[test]
fn workers_draw_identities_from_catalog() -> AppResult<()> {
    run_paused_test(async {
        let transport = FakeTransport::ok(Duration::ZERO);
        let seen = Arc::clone(&transport.seen);
        let config = run_config(Duration::from_secs(10), fixed_think(20)?)?;
        run_with(config, vec![transport]).await?;

        let seen = seen
            .lock()
            .map_err(|_err| AppError::validation("Identity log poisoned"))?;
        let distinct: HashSet<&str> = seen.iter().map(String::as_str).collect();
        if distinct.iter().any(|identity| !IDENTITIES.contains(identity)) {
            return Err(AppError::validation(format!(
                "Identity outside the catalog: {:?}",
                distinct
            )));
        }
        if distinct.len() != IDENTITIES.len() {
            return Err(AppError::validation(format!(
                "Expected every identity to be used, saw {:?}",
                distinct
            )));
        }
        Ok(())
    })
}

#[test]
fn think_time_samples_stay_in_bounds() -> AppResult<()> {
    let min = Duration::from_millis(500);
    let max = Duration::from_millis(1500);
    let think = ThinkTime::new(min, max)?;
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..1_000 {
        let pause = think.sample(&mut rng);
        if pause < min || pause > max {
            return Err(AppError::validation(format!(
                "Sampled pause {:?} outside bounds",
                pause
            )));
        }
    }

    let fixed = fixed_think(250)?;
    if fixed.sample(&mut rng) != Duration::from_millis(250) {
        return Err(AppError::validation("Degenerate range must be exact"));
    }
    if ThinkTime::NONE.sample(&mut rng) != Duration::ZERO {
        return Err(AppError::validation("Expected no pause"));
    }
    Ok(())
}

#[test]
fn think_time_rejects_inverted_bounds() -> AppResult<()> {
    if ThinkTime::from_secs_f64(2.0, 1.0).is_ok() {
        return Err(AppError::validation("Expected Err for min > max"));
    }
    if ThinkTime::from_secs_f64(-1.0, 1.0).is_ok() {
        return Err(AppError::validation("Expected Err for negative min"));
    }
    let think = ThinkTime::from_secs_f64(0.25, 0.25)?;
    if think.min() != think.max() {
        return Err(AppError::validation("Expected equal bounds"));
    }
    Ok(())
}

#[test]
fn identity_choice_covers_catalog() -> AppResult<()> {
    let catalog = IdentityCatalog::new(IDENTITIES)?;
    if catalog.len() != 3 || catalog.is_empty() {
        return Err(AppError::validation("Unexpected catalog size"));
    }
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = HashSet::new();
    for _ in 0..300 {
        seen.insert(catalog.choose(&mut rng).as_str().to_owned());
    }
    if seen.len() != 3 {
        return Err(AppError::validation(format!(
            "Expected all identities, saw {:?}",
            seen
        )));
    }

    let single = IdentityCatalog::new(["only"])?;
    if single.choose(&mut rng).as_str() != "only" {
        return Err(AppError::validation("Single-entry catalog must yield its entry"));
    }
    Ok(())
}

#[test]
fn identity_catalog_rejects_empty_and_invalid() -> AppResult<()> {
    if IdentityCatalog::new(Vec::<String>::new()).is_ok() {
        return Err(AppError::validation("Expected Err for empty catalog"));
    }
    if IdentityCatalog::new(["bad\nvalue"]).is_ok() {
        return Err(AppError::validation("Expected Err for invalid header value"));
    }
    Ok(())
}

#[test]
fn request_limiter_caps_reservations() -> AppResult<()> {
    if RequestLimiter::new(None).is_some() {
        return Err(AppError::validation("Expected no limiter without a cap"));
    }
    let limiter = RequestLimiter::new(Some(3))
        .ok_or_else(|| AppError::validation("Expected limiter"))?;
    let granted = (0..10).filter(|_| limiter.try_reserve()).count();
    if granted != 3 || limiter.reserved() != 3 {
        return Err(AppError::validation(format!(
            "Expected 3 reservations, got {}",
            granted
        )));
    }
    Ok(())
}

#[test]
fn run_config_from_args_uses_default_catalog() -> AppResult<()> {
    let args = parse_test_args(["loadpulse", "-u", "http://localhost:8080/", "-t", "5", "-c", "4"])?;
    let config = RunConfig::from_args(&args)?;
    if config.duration != Duration::from_secs(5) || config.concurrency != 4 {
        return Err(AppError::validation("Unexpected duration or concurrency"));
    }
    if config.identities.len() != crate::args::DEFAULT_IDENTITY_CATALOG.len() {
        return Err(AppError::validation("Expected the built-in identity catalog"));
    }
    if config.think.min() != Duration::from_millis(500)
        || config.think.max() != Duration::from_millis(1500)
    {
        return Err(AppError::validation("Unexpected default think time"));
    }
    if config.identity_header.as_str() != "user-agent" {
        return Err(AppError::validation("Unexpected identity header"));
    }
    Ok(())
}

#[test]
fn run_config_from_args_rejects_invalid_input() -> AppResult<()> {
    let cases: [&[&str]; 5] = [
        &["loadpulse", "-t", "5", "-c", "1"],
        &["loadpulse", "-u", "http://localhost", "-c", "1"],
        &["loadpulse", "-u", "http://localhost", "-t", "5"],
        &["loadpulse", "-u", "ftp://localhost", "-t", "5", "-c", "1"],
        &[
            "loadpulse",
            "-u",
            "http://localhost",
            "-t",
            "5",
            "-c",
            "1",
            "--min-think",
            "2",
            "--max-think",
            "1",
        ],
    ];
    for case in cases {
        let args = parse_test_args(case.iter().copied())?;
        if RunConfig::from_args(&args).is_ok() {
            return Err(AppError::validation(format!("Expected Err for {:?}", case)));
        }
    }
    Ok(())
}

#[test]
fn run_config_reads_identity_file() -> AppResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "# crawler identities")?;
    writeln!(file, "crawler-one")?;
    writeln!(file)?;
    writeln!(file, "  crawler-two  ")?;
    let path = file.path().to_string_lossy().into_owned();

    let args = parse_test_args([
        "loadpulse",
        "-u",
        "https://example.test/",
        "-t",
        "1",
        "-c",
        "1",
        "--identity",
        "inline-agent",
        "--identity-file",
        path.as_str(),
    ])?;
    let config = RunConfig::from_args(&args)?;
    let identities: Vec<&str> = config.identities.iter().map(Identity::as_str).collect();
    if identities != ["inline-agent", "crawler-one", "crawler-two"] {
        return Err(AppError::validation(format!(
            "Unexpected identities: {:?}",
            identities
        )));
    }
    Ok(())
}

#[test]
fn run_config_rejects_empty_identity_file() -> AppResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "# nothing here")?;
    let path = file.path().to_string_lossy().into_owned();
    let args = parse_test_args([
        "loadpulse",
        "-u",
        "http://localhost",
        "-t",
        "1",
        "-c",
        "1",
        "--identity-file",
        path.as_str(),
    ])?;
    match RunConfig::from_args(&args) {
        Err(crate::error::ValidationError::EmptyIdentityCatalog) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected EmptyIdentityCatalog, got {:?}",
            other.map(|config| config.identities.len())
        ))),
    }
}
