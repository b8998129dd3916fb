//! Typed edits to an assessment record.
//!
//! Fields are addressed by their wire name (`contactName`, `primaryUse`, ...)
//! so the browser form can send exactly what it renders. Every edit either
//! applies completely or leaves the record untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, ValueKind};

use super::model::{AssessmentRecord, Driver, Vehicle, WireChoice};

/// Lowest and highest accepted lead/fit score.
const SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// A value submitted for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Flag(_) => ValueKind::Flag,
            Self::Integer(_) => ValueKind::Integer,
            Self::Text(_) => ValueKind::Text,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A mutable view of one field, tagged with what it accepts.
enum Slot<'a> {
    Text(&'a mut String),
    Flag(&'a mut bool),
    Score(&'a mut u8),
    Choice(&'a mut dyn WireChoice),
}

impl Slot<'_> {
    fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) | Self::Choice(_) => ValueKind::Text,
            Self::Flag(_) => ValueKind::Flag,
            Self::Score(_) => ValueKind::Integer,
        }
    }

    fn assign(self, field: &str, value: FieldValue) -> Result<(), EditorError> {
        match (self, value) {
            (Slot::Text(target), FieldValue::Text(v)) => *target = v,
            (Slot::Flag(target), FieldValue::Flag(v)) => *target = v,
            (Slot::Score(target), FieldValue::Integer(v)) => {
                if !SCORE_RANGE.contains(&v) {
                    return Err(EditorError::InvalidValue {
                        field: field.to_string(),
                        reason: format!(
                            "{v} is outside {}..={}",
                            SCORE_RANGE.start(),
                            SCORE_RANGE.end()
                        ),
                    });
                }
                *target = v as u8;
            }
            (Slot::Choice(target), FieldValue::Text(v)) => {
                if !target.set_from_wire(&v) {
                    return Err(EditorError::InvalidValue {
                        field: field.to_string(),
                        reason: format!("{v:?} is not one of {:?}", target.members()),
                    });
                }
            }
            (slot, value) => {
                return Err(EditorError::TypeMismatch {
                    field: field.to_string(),
                    expected: slot.kind(),
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }
}

fn scalar_slot<'a>(record: &'a mut AssessmentRecord, field: &str) -> Option<Slot<'a>> {
    let slot = match field {
        "companyName" => Slot::Text(&mut record.company_name),
        "contactName" => Slot::Text(&mut record.contact_name),
        "email" => Slot::Text(&mut record.email),
        "phone" => Slot::Text(&mut record.phone),
        "website" => Slot::Text(&mut record.website),
        "industry" => Slot::Text(&mut record.industry),

        "autoNeeded" => Slot::Flag(&mut record.auto_needed),
        "autoLiabilityLimits" => Slot::Choice(&mut record.auto_liability_limits),
        "autoCompCollision" => Slot::Flag(&mut record.auto_comp_collision),
        "autoRoadside" => Slot::Flag(&mut record.auto_roadside),
        "autoGapCoverage" => Slot::Flag(&mut record.auto_gap_coverage),

        "homeNeeded" => Slot::Flag(&mut record.home_needed),
        "propertyAddress" => Slot::Text(&mut record.property_address),
        "yearBuilt" => Slot::Text(&mut record.year_built),
        "squareFootage" => Slot::Text(&mut record.square_footage),
        "constructionType" => Slot::Choice(&mut record.construction_type),
        "roofType" => Slot::Text(&mut record.roof_type),
        "roofReplaced" => Slot::Text(&mut record.roof_replaced),
        "propertyType" => Slot::Choice(&mut record.property_type),
        "basement" => Slot::Text(&mut record.basement),
        "detachedStructures" => Slot::Text(&mut record.detached_structures),
        "replacementCost" => Slot::Text(&mut record.replacement_cost),
        "heatingCooling" => Slot::Text(&mut record.heating_cooling),
        "safetySystemsHome" => Slot::Text(&mut record.safety_systems_home),
        "smartHome" => Slot::Text(&mut record.smart_home),
        "systemUpdates" => Slot::Text(&mut record.system_updates),
        "occupancyType" => Slot::Text(&mut record.occupancy_type),
        "occupants" => Slot::Text(&mut record.occupants),
        "pets" => Slot::Text(&mut record.pets),
        "homebusiness" => Slot::Text(&mut record.homebusiness),
        "homeDeductible" => Slot::Choice(&mut record.home_deductible),
        "personalPropertyCoverage" => Slot::Text(&mut record.personal_property_coverage),
        "floodEarthquake" => Slot::Flag(&mut record.flood_earthquake),
        "priorClaims" => Slot::Text(&mut record.prior_claims),

        "currentChallenges" => Slot::Text(&mut record.current_challenges),
        "goals" => Slot::Text(&mut record.goals),
        "budget" => Slot::Choice(&mut record.budget),
        "timeline" => Slot::Choice(&mut record.timeline),
        "currentSolutions" => Slot::Text(&mut record.current_solutions),
        "painPoints" => Slot::Text(&mut record.pain_points),
        "decisionProcess" => Slot::Text(&mut record.decision_process),
        "additionalNotes" => Slot::Text(&mut record.additional_notes),

        "leadScore" => Slot::Score(&mut record.lead_score),
        "urgency" => Slot::Choice(&mut record.urgency),
        "fitScore" => Slot::Score(&mut record.fit_score),
        _ => return None,
    };
    Some(slot)
}

fn vehicle_slot<'a>(vehicle: &'a mut Vehicle, field: &str) -> Option<Slot<'a>> {
    let slot = match field {
        "year" => Slot::Text(&mut vehicle.year),
        "make" => Slot::Text(&mut vehicle.make),
        "model" => Slot::Text(&mut vehicle.model),
        "vin" => Slot::Text(&mut vehicle.vin),
        "ownership" => Slot::Choice(&mut vehicle.ownership),
        "primaryUse" => Slot::Choice(&mut vehicle.primary_use),
        "annualMileage" => Slot::Text(&mut vehicle.annual_mileage),
        "safetyFeatures" => Slot::Text(&mut vehicle.safety_features),
        "modifications" => Slot::Text(&mut vehicle.modifications),
        "garagedAddress" => Slot::Text(&mut vehicle.garaged_address),
        "existingDamages" => Slot::Text(&mut vehicle.existing_damages),
        _ => return None,
    };
    Some(slot)
}

fn driver_slot<'a>(driver: &'a mut Driver, field: &str) -> Option<Slot<'a>> {
    let slot = match field {
        "name" => Slot::Text(&mut driver.name),
        "dob" => Slot::Text(&mut driver.dob),
        "licenseNumber" => Slot::Text(&mut driver.license_number),
        "drivingHistory" => Slot::Text(&mut driver.driving_history),
        "defensiveDriving" => Slot::Flag(&mut driver.defensive_driving),
        "studentGrades" => Slot::Text(&mut driver.student_grades),
        _ => return None,
    };
    Some(slot)
}

/// Build a new entry list where only `index` is replaced by an edited copy.
///
/// The untouched entries are shared with the input list, not cloned.
fn replace_entry<T: Clone>(
    entries: &[Arc<T>],
    collection: &'static str,
    index: usize,
    edit: impl FnOnce(&mut T) -> Result<(), EditorError>,
) -> Result<Vec<Arc<T>>, EditorError> {
    let current = entries.get(index).ok_or(EditorError::IndexOutOfRange {
        collection,
        index,
        len: entries.len(),
    })?;

    let mut updated = T::clone(current);
    edit(&mut updated)?;

    let mut replaced = entries.to_vec();
    replaced[index] = Arc::new(updated);
    Ok(replaced)
}

/// Replace one top-level field of the record.
pub fn set_scalar(
    record: &mut AssessmentRecord,
    field: &str,
    value: FieldValue,
) -> Result<(), EditorError> {
    let slot =
        scalar_slot(record, field).ok_or_else(|| EditorError::UnknownField(field.to_string()))?;
    slot.assign(field, value)
}

/// Replace one field of the vehicle at `index`.
pub fn set_vehicle_field(
    record: &mut AssessmentRecord,
    index: usize,
    field: &str,
    value: FieldValue,
) -> Result<(), EditorError> {
    let vehicles = replace_entry(&record.vehicles, "vehicles", index, |vehicle| {
        vehicle_slot(vehicle, field)
            .ok_or_else(|| EditorError::UnknownField(format!("vehicles.{field}")))?
            .assign(field, value)
    })?;
    record.vehicles = vehicles;
    Ok(())
}

/// Replace one field of the driver at `index`.
pub fn set_driver_field(
    record: &mut AssessmentRecord,
    index: usize,
    field: &str,
    value: FieldValue,
) -> Result<(), EditorError> {
    let drivers = replace_entry(&record.drivers, "drivers", index, |driver| {
        driver_slot(driver, field)
            .ok_or_else(|| EditorError::UnknownField(format!("drivers.{field}")))?
            .assign(field, value)
    })?;
    record.drivers = drivers;
    Ok(())
}

/// Append a blank vehicle. Returns the new vehicle count.
pub fn add_vehicle(record: &mut AssessmentRecord) -> usize {
    record.vehicles.push(Arc::new(Vehicle::default()));
    record.vehicles.len()
}

/// Append a blank driver. Returns the new driver count.
pub fn add_driver(record: &mut AssessmentRecord) -> usize {
    record.drivers.push(Arc::new(Driver::default()));
    record.drivers.len()
}
