use crate::database::{FormStore, StoreError};
use crate::models::{WheelSpecificationCreate, WheelSpecificationFields};
use chrono::NaiveDate;
use tracing::{debug, info};

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}

pub fn demo_wheel_specifications() -> Vec<WheelSpecificationCreate> {
    vec![
        WheelSpecificationCreate {
            form_number: "WHEEL-2025-001".to_string(),
            submitted_by: "user_id_123".to_string(),
            submitted_date: demo_date(2025, 7, 3),
            fields: Some(WheelSpecificationFields {
                condemning_dia: text("825 (800-900)"),
                last_shop_issue_size: text("837 (800-900)"),
                tread_diameter_new: text("915 (900-1000)"),
                wheel_gauge: text("1600 (+2,-1)"),
                axle_box_housing_bore_dia: text("280 (+0.030/+0.052)"),
                bearing_seat_diameter: text("130.043 TO 130.068"),
                intermediate_wwp: text("20 TO 28"),
                roller_bearing_bore_dia: text("130 (+0.0/-0.025)"),
                roller_bearing_outer_dia: text("280 (+0.0/-0.035)"),
                roller_bearing_width: text("93 (+0/-0.250)"),
                variation_same_axle: text("0.5"),
                variation_same_bogie: text("5"),
                variation_same_coach: text("13"),
                wheel_disc_width: text("127 (+4/-0)"),
                wheel_profile: text("29.4 Flange Thickness"),
            }),
        },
        WheelSpecificationCreate {
            form_number: "WHEEL-2025-002".to_string(),
            submitted_by: "user_id_456".to_string(),
            submitted_date: demo_date(2025, 7, 4),
            fields: Some(WheelSpecificationFields {
                condemning_dia: text("830 (800-900)"),
                last_shop_issue_size: text("840 (800-900)"),
                tread_diameter_new: text("920 (900-1000)"),
                wheel_gauge: text("1601 (+2,-1)"),
                ..Default::default()
            }),
        },
    ]
}

/// Inserts the demo records that are not stored yet and returns how many were
/// added. Safe to call repeatedly.
pub fn seed_demo_wheel_specifications(store: &FormStore) -> Result<usize, StoreError> {
    let mut added = 0;
    for spec in demo_wheel_specifications() {
        match store.create_wheel_specification(&spec) {
            Ok(_) => added += 1,
            Err(StoreError::Conflict(form_number)) => {
                debug!(%form_number, "demo wheel specification already present");
            }
            Err(err) => return Err(err),
        }
    }
    info!(added, "seeded demo wheel specifications");
    Ok(added)
}
