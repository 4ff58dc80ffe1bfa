use chrono::{DateTime, Duration, Local};

use crate::{
    aggregate::Aggregator,
    model::{AggregatedRecord, BestRecommendation, DayReport, Report, ScoredZone, Zone},
    progress::ProgressObserver,
    score::score,
};

/// Days covered by a report, starting today.
pub const HORIZON_DAYS: usize = 3;

/// Zones listed per day in the rendered summary.
pub const TOP_ZONES_PER_DAY: usize = 3;

pub fn score_zone(zone: &Zone, record: AggregatedRecord) -> ScoredZone {
    let (score, rating) = score(record.wind_knots);
    ScoredZone { zone: zone.name.clone(), record, score, rating }
}

/// Best score first. The sort is stable, so ties keep registration order.
pub fn rank(zones: &mut [ScoredZone]) {
    zones.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Top zone of the earliest day whose top score beats every earlier day.
///
/// Days are scanned in order with a strict `>` against a running maximum that
/// starts at zero, so a later day that only equals the best is ignored.
pub fn best_recommendation(days: &[DayReport]) -> Option<BestRecommendation> {
    let mut best: Option<BestRecommendation> = None;
    let mut best_score = 0;

    for day in days {
        let Some(top) = day.zones.first() else {
            continue;
        };
        if top.score > best_score {
            best_score = top.score;
            best = Some(BestRecommendation {
                day_index: day.day_index,
                date: day.date,
                zone: top.clone(),
            });
        }
    }

    best
}

/// Run the aggregator over every zone and day, then rank.
///
/// Zones are visited in registration order and, within a zone, days in order.
pub async fn build_report(
    aggregator: &Aggregator,
    zones: &[Zone],
    generated_at: DateTime<Local>,
    horizon: usize,
    observer: &dyn ProgressObserver,
) -> Report {
    let today = generated_at.date_naive();
    let mut days: Vec<DayReport> = (0..horizon)
        .map(|day_index| DayReport {
            day_index,
            date: today + Duration::days(day_index as i64),
            zones: Vec::new(),
        })
        .collect();

    observer.run_started(zones.len(), horizon, aggregator.total_providers());

    for (i, zone) in zones.iter().enumerate() {
        observer.zone_started(i + 1, zones.len(), zone);

        for day in days.iter_mut() {
            match aggregator.aggregate(zone, day.day_index, observer).await {
                Some(record) => day.zones.push(score_zone(zone, record)),
                None => observer.zone_day_skipped(zone, day.day_index),
            }
        }
    }

    observer.run_finished();

    for day in days.iter_mut() {
        rank(&mut day.zones);
    }

    let best = best_recommendation(&days);
    Report { generated_at, days, best }
}
