//! Plain-text rendering of a [`Report`] for the console and the messaging endpoint.

use std::fmt;

use crate::{
    model::{DayReport, Report, ScoredZone},
    provider::ProviderId,
    report::TOP_ZONES_PER_DAY,
};

const RULE_WIDTH: usize = 50;

const SAFETY_TIPS: &[&str] = &[
    "Always check local conditions before launching",
    "Carry: 3-5mm wetsuit, helmet, GPS, whistle",
    "NEVER paddle offshore alone",
    "Tell someone your route and expected return time",
];

pub fn render(report: &Report) -> String {
    report.to_string()
}

fn sources() -> String {
    ProviderId::all().iter().map(|p| p.display_name()).collect::<Vec<_>>().join(" + ")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🎣 OFFSHORE KAYAK OUTLOOK - MALLORCA")?;
        writeln!(
            f,
            "📅 {} | {}",
            self.generated_at.format("%d %B %Y"),
            self.generated_at.format("%H:%M")
        )?;
        writeln!(f, "🔗 Average of {} sources: {}", ProviderId::all().len(), sources())?;
        writeln!(f, "{}", "═".repeat(RULE_WIDTH))?;
        writeln!(f)?;

        for day in &self.days {
            write_day(f, day)?;
            writeln!(f, "{}", "─".repeat(RULE_WIDTH))?;
        }

        writeln!(f, "{}", "═".repeat(RULE_WIDTH))?;

        match &self.best {
            Some(best) => {
                let zone = &best.zone;
                writeln!(f, "🎯 BEST DAY FOR OFFSHORE:")?;
                let date = best.date.format("%d/%m");
                writeln!(f, "   📅 {} ({date})", best.label().to_uppercase())?;
                writeln!(f, "   📍 {}", zone.zone)?;
                writeln!(f, "   ⭐ Score: {}/10 {}", zone.score, zone.rating)?;
                writeln!(f, "   💨 Wind: {:.1} knots", zone.record.wind_knots)?;
                writeln!(f, "   🌡️ Temp: {:.0}°C", zone.record.temperature_c)?;
            }
            None => writeln!(f, "🎯 BEST DAY: ⚠️ Not enough data")?,
        }

        writeln!(f)?;
        writeln!(f, "💡 TIPS:")?;
        for tip in SAFETY_TIPS {
            writeln!(f, "   • {tip}")?;
        }
        write!(f, "🔗 Sources: {}", sources())
    }
}

fn write_day(f: &mut fmt::Formatter<'_>, day: &DayReport) -> fmt::Result {
    writeln!(f, "📌 {} {}", day.label().to_uppercase(), day.short_date())?;

    if day.zones.is_empty() {
        return writeln!(f, "  ⚠️ No data");
    }

    for (i, zone) in day.top(TOP_ZONES_PER_DAY).iter().enumerate() {
        write_zone(f, i + 1, zone)?;
    }
    Ok(())
}

fn write_zone(f: &mut fmt::Formatter<'_>, position: usize, zone: &ScoredZone) -> fmt::Result {
    let record = &zone.record;
    writeln!(f, "  {position}. {}", zone.zone)?;
    writeln!(
        f,
        "     Wind: {:.1} kn | Temp: {:.0}°C | {}",
        record.wind_knots, record.temperature_c, zone.rating
    )?;
    writeln!(
        f,
        "     Confidence: {:.0}% ({}/{} sources)",
        record.confidence_pct, record.sources, record.total_providers
    )
}
