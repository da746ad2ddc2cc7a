//! Fetch command: refreshes the schedule cache.

use std::io::Write;

use anyhow::{Result, bail};
use chrono_tz::Tz;
use clap::Args;
use rf_fetch::FetchError;

use crate::loader::LoadArgs;

#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub load: LoadArgs,
}

/// Reports one line per schedule and fails if any could not be obtained.
///
/// Feeds are parsed too, so a download that is not a calendar shows up here
/// rather than as an empty schedule at query time.
pub fn run<W: Write>(
    writer: &mut W,
    results: &[(String, Result<String, FetchError>)],
    zone: Tz,
) -> Result<()> {
    let mut failed = 0;
    for (schedule_id, result) in results {
        match result {
            Ok(contents) => match rf_data::parse_calendar(schedule_id, contents, zone) {
                Ok(schedule) => {
                    let plural = if schedule.len() == 1 { "" } else { "s" };
                    writeln!(writer, "{schedule_id}: {} course{plural}", schedule.len())?;
                }
                Err(e) => {
                    failed += 1;
                    writeln!(writer, "{schedule_id}: {e}")?;
                }
            },
            Err(e) => {
                failed += 1;
                writeln!(writer, "{schedule_id}: failed ({e})")?;
            }
        }
    }

    let fetched = results.len() - failed;
    writeln!(writer, "Fetched {fetched} of {} schedules.", results.len())?;
    if failed > 0 {
        bail!("{failed} schedule(s) could not be fetched");
    }
    Ok(())
}
