use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmbcChecksheet {
    pub adjusting_tube: Option<String>,
    pub cylinder_body: Option<String>,
    pub piston_trunnion: Option<String>,
    pub plunger_spring: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BogieChecksheetDetails {
    pub axle_guide: Option<String>,
    pub bogie_frame_condition: Option<String>,
    pub bolster: Option<String>,
    pub bolster_suspension_bracket: Option<String>,
    pub lower_spring_seat: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BogieDetails {
    pub bogie_no: Option<String>,
    #[serde(rename = "dateOfIOH")]
    pub date_of_ioh: Option<NaiveDate>,
    pub deficit_components: Option<String>,
    pub incoming_div_and_date: Option<String>,
    pub maker_year_built: Option<String>,
}

/// A checksheet submission that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BogieChecksheetCreate {
    pub form_number: String,
    pub inspection_by: String,
    pub inspection_date: NaiveDate,
    pub bmbc_checksheet: Option<BmbcChecksheet>,
    pub bogie_checksheet: Option<BogieChecksheetDetails>,
    pub bogie_details: Option<BogieDetails>,
}

/// A checksheet row as persisted. Nested sections are kept as the JSON that
/// was written, the store does not interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct BogieChecksheetRecord {
    pub id: i64,
    pub form_number: String,
    pub inspection_by: String,
    pub inspection_date: NaiveDate,
    pub bmbc_checksheet: Option<Value>,
    pub bogie_checksheet: Option<Value>,
    pub bogie_details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Dimensional measurements of a wheel specification. Values are free-form
/// because they usually carry a tolerance, e.g. `"825 (800-900)"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSpecificationFields {
    pub condemning_dia: Option<String>,
    pub last_shop_issue_size: Option<String>,
    pub tread_diameter_new: Option<String>,
    pub wheel_gauge: Option<String>,
    pub axle_box_housing_bore_dia: Option<String>,
    pub bearing_seat_diameter: Option<String>,
    #[serde(rename = "intermediateWWP")]
    pub intermediate_wwp: Option<String>,
    pub roller_bearing_bore_dia: Option<String>,
    pub roller_bearing_outer_dia: Option<String>,
    pub roller_bearing_width: Option<String>,
    pub variation_same_axle: Option<String>,
    pub variation_same_bogie: Option<String>,
    pub variation_same_coach: Option<String>,
    pub wheel_disc_width: Option<String>,
    pub wheel_profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSpecificationCreate {
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub fields: Option<WheelSpecificationFields>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSpecificationRecord {
    pub id: i64,
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub fields: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Exact-match predicates for listing wheel specifications. Unset fields do
/// not constrain the result; set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelSpecificationFilter {
    pub form_number: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_date: Option<NaiveDate>,
}

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
