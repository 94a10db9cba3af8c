//! Demonstration records created on first start.

use super::TaskData;
use chrono::NaiveDate;

/// Returns the demonstration tasks, both pending and in category `Cat1`.
#[must_use]
pub fn default_tasks() -> Vec<TaskData> {
    [
        ("Test !", "description 1", (2000, 4, 8), true),
        ("Rendu intermédiaire", "description 2", (2020, 4, 10), false),
    ]
    .into_iter()
    .filter_map(|(title, description, (year, month, day), urgent)| {
        NaiveDate::from_ymd_opt(year, month, day).map(|deadline| {
            TaskData::new(title, deadline)
                .with_category("Cat1")
                .with_description(description)
                .with_urgent(urgent)
        })
    })
    .collect()
}
