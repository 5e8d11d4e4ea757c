use crate::models::{BogieChecksheetRecord, WheelSpecificationFields, WheelSpecificationRecord};
use chrono::NaiveDate;
use serde::Serialize;

pub const CHECKSHEET_SAVED_MESSAGE: &str = "Bogie checksheet submitted successfully.";
pub const WHEEL_LIST_MESSAGE: &str = "Filtered wheel specification forms fetched successfully.";
pub const WHEEL_LIST_EMPTY_MESSAGE: &str = "No wheel specification forms found matching the criteria.";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: &str) -> Self {
        ApiResponse {
            data,
            message: message.to_string(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BogieChecksheetSaved {
    pub form_number: String,
    pub inspection_by: String,
    pub inspection_date: NaiveDate,
    pub status: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WheelSpecificationItem {
    pub fields: WheelSpecificationFields,
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
}

/// Nested checksheet sections are not echoed back.
pub fn checksheet_saved(record: &BogieChecksheetRecord) -> ApiResponse<BogieChecksheetSaved> {
    ApiResponse::ok(
        BogieChecksheetSaved {
            form_number: record.form_number.clone(),
            inspection_by: record.inspection_by.clone(),
            inspection_date: record.inspection_date,
            status: "Saved",
        },
        CHECKSHEET_SAVED_MESSAGE,
    )
}

/// An absent `fields` blob becomes an object with every key set to null.
pub fn wheel_specification_item(
    record: WheelSpecificationRecord,
) -> Result<WheelSpecificationItem, serde_json::Error> {
    let fields = match record.fields {
        Some(blob) => serde_json::from_value(blob)?,
        None => WheelSpecificationFields::default(),
    };
    Ok(WheelSpecificationItem {
        fields,
        form_number: record.form_number,
        submitted_by: record.submitted_by,
        submitted_date: record.submitted_date,
    })
}

pub fn wheel_specification_list(
    records: Vec<WheelSpecificationRecord>,
) -> Result<ApiResponse<Vec<WheelSpecificationItem>>, serde_json::Error> {
    let items = records
        .into_iter()
        .map(wheel_specification_item)
        .collect::<Result<Vec<_>, _>>()?;
    let message = if items.is_empty() {
        WHEEL_LIST_EMPTY_MESSAGE
    } else {
        WHEEL_LIST_MESSAGE
    };
    Ok(ApiResponse::ok(items, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(fields: Option<serde_json::Value>) -> WheelSpecificationRecord {
        WheelSpecificationRecord {
            id: 1,
            form_number: "WHEEL-2025-001".to_string(),
            submitted_by: "user_id_123".to_string(),
            submitted_date: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            fields,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_fields_blob_renders_every_key_as_null() {
        let item = wheel_specification_item(record(None)).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        let fields = value["fields"].as_object().unwrap();
        assert_eq!(fields.len(), 15);
        assert!(fields.values().all(|v| v.is_null()));
        assert!(fields.contains_key("intermediateWWP"));
        assert_eq!(value["submittedDate"], json!("2025-07-03"));
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn partial_fields_blob_fills_the_rest() {
        let item = wheel_specification_item(record(Some(json!({"wheelGauge": "1600 (+2,-1)"})))).unwrap();
        assert_eq!(item.fields.wheel_gauge.as_deref(), Some("1600 (+2,-1)"));
        assert_eq!(item.fields.condemning_dia, None);
    }

    #[test]
    fn empty_list_uses_informational_message() {
        let response = wheel_specification_list(Vec::new()).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"data": [], "message": WHEEL_LIST_EMPTY_MESSAGE, "success": true})
        );
    }

    #[test]
    fn saved_checksheet_omits_nested_sections() {
        let record = BogieChecksheetRecord {
            id: 7,
            form_number: "BOGIE-2025-001".to_string(),
            inspection_by: "user_id_456".to_string(),
            inspection_date: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            bmbc_checksheet: Some(json!({"adjustingTube": "DAMAGED"})),
            bogie_checksheet: None,
            bogie_details: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(checksheet_saved(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "data": {
                    "formNumber": "BOGIE-2025-001",
                    "inspectionBy": "user_id_456",
                    "inspectionDate": "2025-07-03",
                    "status": "Saved"
                },
                "message": CHECKSHEET_SAVED_MESSAGE,
                "success": true
            })
        );
    }
}
