//! Per-trial field extraction from the registry's nested JSON.

use serde_json::Value;
use tracing::{debug, info};

use ctu_model::TrialId;

use crate::dedup::dedup_first_occurrence;

/// Locations outside these countries are ignored.
pub const COUNTRY_ALLOW_LIST: &[&str] = &["Australia", "New Zealand"];

/// Flat per-trial row produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFields {
    pub nct_id: TrialId,
    pub brief_title: String,
    pub lead_sponsor: String,
    pub intervention_types: Vec<String>,
    pub intervention_names: Vec<String>,
    pub intervention_other_names: Vec<String>,
    pub facilities: Vec<String>,
    pub addresses: Vec<String>,
}

/// Extraction accounting for the CLI summary.
#[derive(Debug, Clone)]
pub struct ExtractSummary {
    pub read: usize,
    pub extracted: usize,
    pub retained: usize,
}

fn str_at<'a>(study: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = study;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str()
}

fn trimmed_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Identity fields: trial id, title, lead sponsor.
pub fn extract_basic_fields(study: &Value) -> Option<(TrialId, String, String)> {
    let nct_id = str_at(study, &["protocolSection", "identificationModule", "nctId"])?;
    let nct_id = TrialId::new(nct_id).ok()?;
    let brief_title = str_at(study, &["protocolSection", "identificationModule", "briefTitle"])
        .unwrap_or_default()
        .trim()
        .to_string();
    let lead_sponsor = str_at(
        study,
        &["protocolSection", "sponsorCollaboratorsModule", "leadSponsor", "name"],
    )
    .unwrap_or_default()
    .trim()
    .to_string();
    Some((nct_id, brief_title, lead_sponsor))
}

/// Deduplicated intervention type/name/alias lists.
pub fn extract_intervention_fields(study: &Value) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut types = Vec::new();
    let mut names = Vec::new();
    let mut other_names = Vec::new();

    let interventions = study
        .get("protocolSection")
        .and_then(|section| section.get("armsInterventionsModule"))
        .and_then(|module| module.get("interventions"))
        .and_then(Value::as_array);

    if let Some(interventions) = interventions {
        for intervention in interventions {
            let kind = trimmed_str(intervention, "type");
            if !kind.is_empty() {
                types.push(kind);
            }
            let name = trimmed_str(intervention, "name");
            if !name.is_empty() {
                names.push(name);
            }
            if let Some(aliases) = intervention.get("otherNames").and_then(Value::as_array) {
                for alias in aliases {
                    if let Some(alias) = alias.as_str() {
                        let alias = alias.trim();
                        if !alias.is_empty() {
                            other_names.push(alias.to_string());
                        }
                    }
                }
            }
        }
    }

    (
        dedup_first_occurrence(&types),
        dedup_first_occurrence(&names),
        dedup_first_occurrence(&other_names),
    )
}

/// Country-filtered, deduplicated facility and address strings.
///
/// The address is "city, state, country, zip" with empty parts dropped.
pub fn extract_location_fields(study: &Value) -> (Vec<String>, Vec<String>) {
    let mut facilities = Vec::new();
    let mut addresses = Vec::new();

    let locations = study
        .get("protocolSection")
        .and_then(|section| section.get("contactsLocationsModule"))
        .and_then(|module| module.get("locations"))
        .and_then(Value::as_array);

    if let Some(locations) = locations {
        for location in locations {
            let country = trimmed_str(location, "country");
            if !COUNTRY_ALLOW_LIST.contains(&country.as_str()) {
                continue;
            }

            facilities.push(trimmed_str(location, "facility"));

            let city = trimmed_str(location, "city");
            let state = trimmed_str(location, "state");
            let zip = trimmed_str(location, "zip");
            let parts: Vec<&str> = [city.as_str(), state.as_str(), country.as_str(), zip.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            addresses.push(parts.join(", "));
        }
    }

    (
        dedup_first_occurrence(&facilities),
        dedup_first_occurrence(&addresses),
    )
}

fn extract_trial(study: &Value) -> Option<TrialFields> {
    let (nct_id, brief_title, lead_sponsor) = extract_basic_fields(study)?;
    let (intervention_types, intervention_names, intervention_other_names) =
        extract_intervention_fields(study);
    let (facilities, addresses) = extract_location_fields(study);
    Some(TrialFields {
        nct_id,
        brief_title,
        lead_sponsor,
        intervention_types,
        intervention_names,
        intervention_other_names,
        facilities,
        addresses,
    })
}

/// Flatten every study in the corpus, then drop trials without a DRUG
/// intervention.
pub fn extract_trials(studies: &[Value]) -> (Vec<TrialFields>, ExtractSummary) {
    let mut rows = Vec::with_capacity(studies.len());
    for study in studies {
        match extract_trial(study) {
            Some(row) => rows.push(row),
            None => debug!("study without NCT id skipped"),
        }
    }
    let extracted = rows.len();
    rows.retain(|row| row.intervention_types.iter().any(|kind| kind == "DRUG"));

    let summary = ExtractSummary {
        read: studies.len(),
        extracted,
        retained: rows.len(),
    };
    info!(
        read = summary.read,
        extracted = summary.extracted,
        retained = summary.retained,
        "field extraction finished"
    );
    (rows, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_study() -> Value {
        json!({
            "protocolSection": {
                "identificationModule": {
                    "nctId": "NCT0001",
                    "briefTitle": " A study "
                },
                "sponsorCollaboratorsModule": {
                    "leadSponsor": { "name": "Acme Oncology" }
                },
                "armsInterventionsModule": {
                    "interventions": [
                        { "type": "DRUG", "name": "Drug A", "otherNames": ["Alias A", " "] },
                        { "type": "DRUG", "name": "Drug A" },
                        { "type": "BIOLOGICAL", "name": "Bio B" }
                    ]
                },
                "contactsLocationsModule": {
                    "locations": [
                        { "facility": "Site 1", "city": "Sydney", "state": "NSW",
                          "country": "Australia", "zip": "2000" },
                        { "facility": "Site 2", "city": "Boston", "state": "MA",
                          "country": "United States", "zip": "02101" },
                        { "facility": "Site 1", "city": "Sydney", "state": "NSW",
                          "country": "Australia", "zip": "2000" }
                    ]
                }
            }
        })
    }

    #[test]
    fn basic_fields_are_trimmed() {
        let (id, title, sponsor) = extract_basic_fields(&sample_study()).unwrap();
        assert_eq!(id.as_str(), "NCT0001");
        assert_eq!(title, "A study");
        assert_eq!(sponsor, "Acme Oncology");
    }

    #[test]
    fn interventions_dedup_in_order() {
        let (types, names, other_names) = extract_intervention_fields(&sample_study());
        assert_eq!(types, vec!["DRUG", "BIOLOGICAL"]);
        assert_eq!(names, vec!["Drug A", "Bio B"]);
        assert_eq!(other_names, vec!["Alias A"]);
    }

    #[test]
    fn locations_filter_by_country_and_dedup() {
        let (facilities, addresses) = extract_location_fields(&sample_study());
        assert_eq!(facilities, vec!["Site 1"]);
        assert_eq!(addresses, vec!["Sydney, NSW, Australia, 2000"]);
    }

    #[test]
    fn trials_without_drug_intervention_are_dropped() {
        let mut no_drug = sample_study();
        no_drug["protocolSection"]["armsInterventionsModule"]["interventions"] =
            json!([{ "type": "BIOLOGICAL", "name": "Bio B" }]);
        let (rows, summary) = extract_trials(&[sample_study(), no_drug]);
        assert_eq!(summary.read, 2);
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.retained, 1);
        assert_eq!(rows[0].nct_id.as_str(), "NCT0001");
    }
}
