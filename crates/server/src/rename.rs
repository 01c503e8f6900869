// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity renaming.
//!
//! Only Strava's auto-generated titles ("Morning Run", "Evening Ride", ...)
//! are replaced; anything an athlete typed themselves is never touched. The
//! replacement is a random pick from a per-sport name pool.

use rand::seq::IndexedRandom;

use crate::error::Result;
use crate::strava::models::Activity;
use crate::strava::StravaClient;

/// Time-of-day prefixes Strava uses in auto-generated titles.
const DEFAULT_PERIODS: [&str; 5] = ["Morning", "Lunch", "Afternoon", "Evening", "Night"];

/// Sport labels that follow the prefix in auto-generated titles.
const DEFAULT_LABELS: [&str; 9] =
    ["Run", "Ride", "Swim", "Walk", "Hike", "Workout", "Weight Training", "Yoga", "Activity"];

const RUN_NAMES: &[&str] = &[
    "Outrunning my excuses",
    "Cardio o'clock",
    "Jog and awe",
    "Personal best pending",
    "Two feet and a heartbeat",
    "Sole searching",
];

const RIDE_NAMES: &[&str] = &[
    "Chain of good decisions",
    "Spokes-person for fitness",
    "Freewheeling it",
    "Saddle up buttercup",
    "Tour de neighborhood",
    "Wheelie good time",
];

const SWIM_NAMES: &[&str] = &[
    "Chlorine therapy",
    "Lap decisions",
    "Freestyle, loosely speaking",
    "Fins and needles",
    "Current affairs",
];

const WALK_NAMES: &[&str] = &[
    "Strolling in the deep",
    "Steps in the right direction",
    "Wander management",
    "Out for a think",
];

const WORKOUT_NAMES: &[&str] = &[
    "Picking things up, putting them down",
    "Reps and recreation",
    "Iron appointment",
    "Sweat equity",
];

const YOGA_NAMES: &[&str] =
    &["Bend it like a pretzel", "Stretch goals", "Down dog, up mood", "Om improvement"];

const FALLBACK_NAMES: &[&str] =
    &["Another one in the books", "Effort detected", "Certified movement", "Gone training"];

/// Whether a title is one of Strava's auto-generated defaults.
pub fn is_default_name(name: &str) -> bool {
    match name.split_once(' ') {
        Some((period, label)) => {
            DEFAULT_PERIODS.contains(&period) && DEFAULT_LABELS.contains(&label)
        }
        None => false,
    }
}

/// Pick a replacement title for a sport type.
pub fn pick_name(sport_type: &str) -> &'static str {
    let pool = name_pool(sport_type);
    pool.choose(&mut rand::rng()).copied().unwrap_or(FALLBACK_NAMES[0])
}

/// Resolve the name pool for a Strava sport type.
fn name_pool(sport_type: &str) -> &'static [&'static str] {
    match sport_type {
        "Run" | "TrailRun" | "VirtualRun" => RUN_NAMES,
        "Ride" | "MountainBikeRide" | "GravelRide" | "EBikeRide" | "EMountainBikeRide"
        | "VirtualRide" => RIDE_NAMES,
        "Swim" => SWIM_NAMES,
        "Walk" | "Hike" => WALK_NAMES,
        "Workout" | "WeightTraining" | "Crossfit" => WORKOUT_NAMES,
        "Yoga" | "Pilates" => YOGA_NAMES,
        _ => FALLBACK_NAMES,
    }
}

/// Rename a single activity if it still carries a default title.
///
/// Returns the new name when a rename happened, `None` when the title was
/// custom (or already renamed) and was left alone.
pub async fn rename_activity(
    strava: &StravaClient,
    access_token: &str,
    activity_id: i64,
) -> Result<Option<&'static str>> {
    let activity = strava.get_activity(access_token, activity_id).await?;
    rename_if_default(strava, access_token, &activity).await
}

/// Rename default-titled activities in one page of recent history.
/// Returns `(scanned, renamed)`.
pub async fn rename_recent(
    strava: &StravaClient,
    access_token: &str,
    page: u32,
    per_page: u32,
) -> Result<(usize, usize)> {
    let activities = strava.list_activities(access_token, page, per_page).await?;
    let scanned = activities.len();
    let mut renamed = 0;
    for activity in &activities {
        if rename_if_default(strava, access_token, activity).await?.is_some() {
            renamed += 1;
        }
    }
    Ok((scanned, renamed))
}

async fn rename_if_default(
    strava: &StravaClient,
    access_token: &str,
    activity: &Activity,
) -> Result<Option<&'static str>> {
    if !is_default_name(&activity.name) {
        tracing::debug!(activity_id = activity.id, "custom title, leaving alone");
        return Ok(None);
    }
    let sport =
        if activity.sport_type.is_empty() { &activity.activity_type } else { &activity.sport_type };
    let name = pick_name(sport);
    strava.update_activity_name(access_token, activity.id, name).await?;
    tracing::info!(activity_id = activity.id, name, "activity renamed");
    Ok(Some(name))
}

#[cfg(test)]
#[path = "rename_tests.rs"]
mod tests;
