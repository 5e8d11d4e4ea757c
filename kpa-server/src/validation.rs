use crate::models::{
    BmbcChecksheet, BogieChecksheetCreate, BogieChecksheetDetails, BogieDetails, Page,
    WheelSpecificationFilter,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    StringType,
    DateFromDatetimeParsing,
    ModelType,
    IntParsing,
    JsonInvalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("request validation failed with {} error(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn invalid_query(detail: impl std::fmt::Display) -> Self {
        ValidationError {
            errors: vec![FieldError {
                loc: vec!["query".to_string()],
                msg: detail.to_string(),
                kind: FieldErrorKind::ModelType,
            }],
        }
    }

    pub fn invalid_json(err: serde_json::Error) -> Self {
        ValidationError {
            errors: vec![FieldError {
                loc: vec!["body".to_string()],
                msg: format!("JSON decode error: {}", err),
                kind: FieldErrorKind::JsonInvalid,
            }],
        }
    }
}

/// Accepts exactly `YYYY-MM-DD`; chrono alone would also take unpadded parts.
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    loc: Vec<String>,
    errors: &'a mut Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn push(&mut self, key: &str, kind: FieldErrorKind, msg: &str) {
        let mut loc = self.loc.clone();
        loc.push(key.to_string());
        self.errors.push(FieldError {
            loc,
            msg: msg.to_string(),
            kind,
        });
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        let object = self.object;
        match object.get(key) {
            None => {
                self.push(key, FieldErrorKind::Missing, "Field required");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, FieldErrorKind::StringType, "Input should be a valid string");
                None
            }
        }
    }

    fn optional_str(&mut self, key: &str) -> Option<String> {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, FieldErrorKind::StringType, "Input should be a valid string");
                None
            }
        }
    }

    fn required_date(&mut self, key: &str) -> Option<NaiveDate> {
        let object = self.object;
        match object.get(key) {
            None => {
                self.push(key, FieldErrorKind::Missing, "Field required");
                None
            }
            Some(Value::Null) => {
                self.push(
                    key,
                    FieldErrorKind::DateFromDatetimeParsing,
                    "Input should be a valid date in the format YYYY-MM-DD",
                );
                None
            }
            Some(_) => self.optional_date(key),
        }
    }

    fn optional_date(&mut self, key: &str) -> Option<NaiveDate> {
        let object = self.object;
        let parsed = match object.get(key) {
            None | Some(Value::Null) => return None,
            Some(Value::String(s)) => parse_iso_date(s),
            Some(_) => None,
        };
        if parsed.is_none() {
            self.push(
                key,
                FieldErrorKind::DateFromDatetimeParsing,
                "Input should be a valid date in the format YYYY-MM-DD",
            );
        }
        parsed
    }

    fn optional_section<T>(
        &mut self,
        key: &str,
        read: impl FnOnce(&mut FieldReader<'_>) -> T,
    ) -> Option<T> {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(nested)) => {
                let mut loc = self.loc.clone();
                loc.push(key.to_string());
                let mut child = FieldReader {
                    object: nested,
                    loc,
                    errors: &mut *self.errors,
                };
                Some(read(&mut child))
            }
            Some(_) => {
                self.push(
                    key,
                    FieldErrorKind::ModelType,
                    "Input should be a valid dictionary or object",
                );
                None
            }
        }
    }
}

fn read_bmbc(r: &mut FieldReader<'_>) -> BmbcChecksheet {
    BmbcChecksheet {
        adjusting_tube: r.optional_str("adjustingTube"),
        cylinder_body: r.optional_str("cylinderBody"),
        piston_trunnion: r.optional_str("pistonTrunnion"),
        plunger_spring: r.optional_str("plungerSpring"),
    }
}

fn read_bogie_checksheet(r: &mut FieldReader<'_>) -> BogieChecksheetDetails {
    BogieChecksheetDetails {
        axle_guide: r.optional_str("axleGuide"),
        bogie_frame_condition: r.optional_str("bogieFrameCondition"),
        bolster: r.optional_str("bolster"),
        bolster_suspension_bracket: r.optional_str("bolsterSuspensionBracket"),
        lower_spring_seat: r.optional_str("lowerSpringSeat"),
    }
}

fn read_bogie_details(r: &mut FieldReader<'_>) -> BogieDetails {
    BogieDetails {
        bogie_no: r.optional_str("bogieNo"),
        date_of_ioh: r.optional_date("dateOfIOH"),
        deficit_components: r.optional_str("deficitComponents"),
        incoming_div_and_date: r.optional_str("incomingDivAndDate"),
        maker_year_built: r.optional_str("makerYearBuilt"),
    }
}

/// Validates a checksheet creation payload, reporting every offending field
/// at once rather than stopping at the first.
pub fn validate_bogie_checksheet(payload: &Value) -> Result<BogieChecksheetCreate, ValidationError> {
    let object = match payload {
        Value::Object(object) => object,
        _ => {
            return Err(ValidationError {
                errors: vec![FieldError {
                    loc: vec!["body".to_string()],
                    msg: "Input should be a valid dictionary or object".to_string(),
                    kind: FieldErrorKind::ModelType,
                }],
            })
        }
    };

    let mut errors = Vec::new();
    let mut reader = FieldReader {
        object,
        loc: vec!["body".to_string()],
        errors: &mut errors,
    };

    let form_number = reader.required_str("formNumber");
    let inspection_by = reader.required_str("inspectionBy");
    let inspection_date = reader.required_date("inspectionDate");
    let bmbc_checksheet = reader.optional_section("bmbcChecksheet", read_bmbc);
    let bogie_checksheet = reader.optional_section("bogieChecksheet", read_bogie_checksheet);
    let bogie_details = reader.optional_section("bogieDetails", read_bogie_details);

    match (form_number, inspection_by, inspection_date) {
        (Some(form_number), Some(inspection_by), Some(inspection_date)) if errors.is_empty() => {
            Ok(BogieChecksheetCreate {
                form_number,
                inspection_by,
                inspection_date,
                bmbc_checksheet,
                bogie_checksheet,
                bogie_details,
            })
        }
        _ => Err(ValidationError { errors }),
    }
}

/// Raw query string of the wheel specification listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelSpecificationParams {
    pub form_number: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_date: Option<String>,
    pub skip: Option<String>,
    pub limit: Option<String>,
}

impl WheelSpecificationParams {
    /// Builds the params from decoded query pairs. A repeated key keeps its
    /// last value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = WheelSpecificationParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "formNumber" => &mut params.form_number,
                "submittedBy" => &mut params.submitted_by,
                "submittedDate" => &mut params.submitted_date,
                "skip" => &mut params.skip,
                "limit" => &mut params.limit,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn query_error(key: &str, kind: FieldErrorKind, msg: &str) -> FieldError {
    FieldError {
        loc: vec!["query".to_string(), key.to_string()],
        msg: msg.to_string(),
        kind,
    }
}

fn parse_count(raw: Option<&str>, key: &str, errors: &mut Vec<FieldError>) -> Option<u32> {
    let raw = raw?;
    match raw.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(query_error(
                key,
                FieldErrorKind::IntParsing,
                "Input should be a valid non-negative integer",
            ));
            None
        }
    }
}

pub fn validate_wheel_query(
    params: &WheelSpecificationParams,
    default_limit: u32,
) -> Result<(WheelSpecificationFilter, Page), ValidationError> {
    let mut errors = Vec::new();

    let submitted_date = match non_empty(&params.submitted_date) {
        None => None,
        Some(raw) => match parse_iso_date(raw) {
            Some(date) => Some(date),
            None => {
                errors.push(query_error(
                    "submittedDate",
                    FieldErrorKind::DateFromDatetimeParsing,
                    "Input should be a valid date in the format YYYY-MM-DD",
                ));
                None
            }
        },
    };
    let skip = parse_count(non_empty(&params.skip), "skip", &mut errors).unwrap_or(0);
    let limit = parse_count(non_empty(&params.limit), "limit", &mut errors).unwrap_or(default_limit);

    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    let filter = WheelSpecificationFilter {
        form_number: non_empty(&params.form_number).map(str::to_string),
        submitted_by: non_empty(&params.submitted_by).map(str::to_string),
        submitted_date,
    };
    Ok((filter, Page { skip, limit }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locs(err: &ValidationError) -> Vec<String> {
        err.errors.iter().map(|e| e.loc.join(".")).collect()
    }

    #[test]
    fn accepts_full_payload() {
        let payload = json!({
            "bmbcChecksheet": {"adjustingTube": "DAMAGED", "cylinderBody": "WORN OUT"},
            "bogieChecksheet": {"axleGuide": "Worn"},
            "bogieDetails": {"bogieNo": "BG1234", "dateOfIOH": "2025-07-01"},
            "formNumber": "BOGIE-2025-001",
            "inspectionBy": "user_id_456",
            "inspectionDate": "2025-07-03"
        });
        let form = validate_bogie_checksheet(&payload).unwrap();
        assert_eq!(form.form_number, "BOGIE-2025-001");
        assert_eq!(form.inspection_date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        let details = form.bogie_details.unwrap();
        assert_eq!(details.date_of_ioh, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(details.maker_year_built, None);
        assert_eq!(form.bmbc_checksheet.unwrap().adjusting_tube.as_deref(), Some("DAMAGED"));
    }

    #[test]
    fn empty_nested_sections_are_legal() {
        let payload = json!({
            "formNumber": "F-1",
            "inspectionBy": "me",
            "inspectionDate": "2025-07-03",
            "bmbcChecksheet": {},
            "bogieChecksheet": null
        });
        let form = validate_bogie_checksheet(&payload).unwrap();
        assert_eq!(form.bmbc_checksheet, Some(BmbcChecksheet::default()));
        assert_eq!(form.bogie_checksheet, None);
        assert_eq!(form.bogie_details, None);
    }

    #[test]
    fn reports_every_offending_field() {
        let payload = json!({
            "formNumber": 42,
            "inspectionDate": "2025-13-40",
            "bogieDetails": {"bogieNo": 7, "dateOfIOH": "yesterday"},
            "bmbcChecksheet": "not an object"
        });
        let err = validate_bogie_checksheet(&payload).unwrap_err();
        assert_eq!(
            locs(&err),
            vec![
                "body.formNumber",
                "body.inspectionBy",
                "body.inspectionDate",
                "body.bmbcChecksheet",
                "body.bogieDetails.bogieNo",
                "body.bogieDetails.dateOfIOH",
            ]
        );
        assert_eq!(err.errors[1].kind, FieldErrorKind::Missing);
        assert_eq!(err.errors[3].kind, FieldErrorKind::ModelType);
    }

    #[test]
    fn null_required_field_is_a_type_error() {
        let payload = json!({"formNumber": null, "inspectionBy": "me", "inspectionDate": "2025-07-03"});
        let err = validate_bogie_checksheet(&payload).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].kind, FieldErrorKind::StringType);
    }

    #[test]
    fn unpadded_dates_are_rejected() {
        let payload = json!({"formNumber": "F", "inspectionBy": "me", "inspectionDate": "2025-7-3"});
        let err = validate_bogie_checksheet(&payload).unwrap_err();
        assert_eq!(locs(&err), vec!["body.inspectionDate"]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_bogie_checksheet(&json!([1, 2])).unwrap_err();
        assert_eq!(locs(&err), vec!["body"]);
    }

    #[test]
    fn query_defaults_and_empty_values() {
        let params = WheelSpecificationParams {
            form_number: Some(String::new()),
            submitted_by: Some("user_id_123".to_string()),
            ..Default::default()
        };
        let (filter, page) = validate_wheel_query(&params, 100).unwrap();
        assert_eq!(filter.form_number, None);
        assert_eq!(filter.submitted_by.as_deref(), Some("user_id_123"));
        assert_eq!(page, Page::default());
    }

    #[test]
    fn repeated_query_keys_keep_the_last_value() {
        let pairs = vec![
            ("formNumber".to_string(), "WHEEL-2025-002".to_string()),
            ("unknown".to_string(), "x".to_string()),
            ("formNumber".to_string(), "WHEEL-2025-001".to_string()),
            ("limit".to_string(), "5".to_string()),
        ];
        let params = WheelSpecificationParams::from_pairs(pairs);
        assert_eq!(params.form_number.as_deref(), Some("WHEEL-2025-001"));
        assert_eq!(params.limit.as_deref(), Some("5"));
        assert_eq!(params.submitted_by, None);
    }

    #[test]
    fn query_rejects_bad_date_and_counts() {
        let params = WheelSpecificationParams {
            submitted_date: Some("03-07-2025".to_string()),
            skip: Some("-1".to_string()),
            limit: Some("ten".to_string()),
            ..Default::default()
        };
        let err = validate_wheel_query(&params, 100).unwrap_err();
        assert_eq!(locs(&err), vec!["query.submittedDate", "query.skip", "query.limit"]);
    }
}
