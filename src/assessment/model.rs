//! Assessment record and its nested vehicle/driver entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A field restricted to a fixed set of wire strings.
pub trait WireChoice {
    /// Replace the value if `value` is a member; returns whether it was.
    fn set_from_wire(&mut self, value: &str) -> bool;

    fn members(&self) -> &'static [&'static str];
}

/// Declares a closed set of string-valued choices as they appear on the wire.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident default $default:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in form order.
            pub const MEMBERS: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl WireChoice for $name {
            fn set_from_wire(&mut self, value: &str) -> bool {
                match Self::from_wire(value) {
                    Some(parsed) => {
                        *self = parsed;
                        true
                    }
                    None => false,
                }
            }

            fn members(&self) -> &'static [&'static str] {
                Self::MEMBERS
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

wire_enum! {
    /// How a vehicle is held.
    pub enum Ownership default Unset {
        Unset => "",
        Owned => "owned",
        Leased => "leased",
        Financed => "financed",
    }
}

wire_enum! {
    pub enum PrimaryUse default Unset {
        Unset => "",
        Commute => "commute",
        Business => "business",
        Pleasure => "pleasure",
    }
}

wire_enum! {
    /// Bodily injury per person / per accident / property damage, in thousands.
    pub enum LiabilityLimits default Unset {
        Unset => "",
        Limits25x50x25 => "25/50/25",
        Limits50x100x50 => "50/100/50",
        Limits100x300x100 => "100/300/100",
        Limits250x500x100 => "250/500/100",
    }
}

wire_enum! {
    pub enum ConstructionType default Unset {
        Unset => "",
        Frame => "frame",
        Masonry => "masonry",
        Brick => "brick",
        Stucco => "stucco",
    }
}

wire_enum! {
    pub enum PropertyType default Unset {
        Unset => "",
        SingleFamily => "single-family",
        Condo => "condo",
        Townhouse => "townhouse",
        MultiFamily => "multi-family",
    }
}

wire_enum! {
    /// Preferred homeowners deductible in dollars.
    pub enum Deductible default Unset {
        Unset => "",
        Usd500 => "500",
        Usd1000 => "1000",
        Usd2500 => "2500",
        Usd5000 => "5000",
    }
}

wire_enum! {
    /// Monthly premium budget.
    pub enum Budget default Unset {
        Unset => "",
        Under200 => "under-200",
        From200To500 => "200-500",
        From500To1000 => "500-1000",
        Over1000 => "1000-plus",
    }
}

wire_enum! {
    pub enum Timeline default Unset {
        Unset => "",
        Immediate => "immediate",
        Within30Days => "30-days",
        Within60Days => "60-days",
        AtRenewal => "renewal",
    }
}

wire_enum! {
    pub enum Urgency default Medium {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

/// One vehicle on the auto step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub year: String,
    pub make: String,
    pub model: String,
    pub vin: String,
    pub ownership: Ownership,
    pub primary_use: PrimaryUse,
    pub annual_mileage: String,
    pub safety_features: String,
    pub modifications: String,
    pub garaged_address: String,
    pub existing_damages: String,
}

/// One driver on the auto step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    pub dob: String,
    pub license_number: String,
    pub driving_history: String,
    pub defensive_driving: bool,
    pub student_grades: String,
}

/// Everything collected for one client during an assessment.
///
/// Vehicles and drivers are held behind `Arc` so that a snapshot taken for
/// submission shares untouched entries with the live record; edits replace
/// only the targeted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    // Client
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub industry: String,

    // Auto
    pub auto_needed: bool,
    pub vehicles: Vec<Arc<Vehicle>>,
    pub drivers: Vec<Arc<Driver>>,
    pub auto_liability_limits: LiabilityLimits,
    pub auto_comp_collision: bool,
    pub auto_roadside: bool,
    pub auto_gap_coverage: bool,

    // Home
    pub home_needed: bool,
    pub property_address: String,
    pub year_built: String,
    pub square_footage: String,
    pub construction_type: ConstructionType,
    pub roof_type: String,
    pub roof_replaced: String,
    pub property_type: PropertyType,
    pub basement: String,
    pub detached_structures: String,
    pub replacement_cost: String,
    pub heating_cooling: String,
    pub safety_systems_home: String,
    pub smart_home: String,
    pub system_updates: String,
    pub occupancy_type: String,
    pub occupants: String,
    pub pets: String,
    pub homebusiness: String,
    pub home_deductible: Deductible,
    pub personal_property_coverage: String,
    pub flood_earthquake: bool,
    pub prior_claims: String,

    // Narrative
    pub current_challenges: String,
    pub goals: String,
    pub budget: Budget,
    pub timeline: Timeline,
    pub current_solutions: String,
    pub pain_points: String,
    pub decision_process: String,
    pub additional_notes: String,

    // Scoring; 0 means not yet scored.
    pub lead_score: u8,
    pub urgency: Urgency,
    pub fit_score: u8,
}

impl Default for AssessmentRecord {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            industry: String::new(),

            auto_needed: false,
            vehicles: vec![Arc::new(Vehicle::default())],
            drivers: vec![Arc::new(Driver::default())],
            auto_liability_limits: LiabilityLimits::default(),
            auto_comp_collision: false,
            auto_roadside: false,
            auto_gap_coverage: false,

            home_needed: false,
            property_address: String::new(),
            year_built: String::new(),
            square_footage: String::new(),
            construction_type: ConstructionType::default(),
            roof_type: String::new(),
            roof_replaced: String::new(),
            property_type: PropertyType::default(),
            basement: String::new(),
            detached_structures: String::new(),
            replacement_cost: String::new(),
            heating_cooling: String::new(),
            safety_systems_home: String::new(),
            smart_home: String::new(),
            system_updates: String::new(),
            occupancy_type: String::new(),
            occupants: String::new(),
            pets: String::new(),
            homebusiness: String::new(),
            home_deductible: Deductible::default(),
            personal_property_coverage: String::new(),
            flood_earthquake: false,
            prior_claims: String::new(),

            current_challenges: String::new(),
            goals: String::new(),
            budget: Budget::default(),
            timeline: Timeline::default(),
            current_solutions: String::new(),
            pain_points: String::new(),
            decision_process: String::new(),
            additional_notes: String::new(),

            lead_score: 0,
            urgency: Urgency::default(),
            fit_score: 0,
        }
    }
}

impl AssessmentRecord {
    /// Wire names of the fields the form marks as required that are still blank.
    ///
    /// Advisory only: nothing in the wizard refuses to move on or submit
    /// because of these.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let required = [
            ("contactName", &self.contact_name),
            ("email", &self.email),
            ("phone", &self.phone),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if self.home_needed && self.property_address.trim().is_empty() {
            missing.push("propertyAddress");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_one_blank_vehicle_and_driver() {
        let record = AssessmentRecord::default();
        assert_eq!(record.vehicles.len(), 1);
        assert_eq!(record.drivers.len(), 1);
        assert_eq!(*record.vehicles[0], Vehicle::default());
        assert_eq!(*record.drivers[0], Driver::default());
        assert!(!record.drivers[0].defensive_driving);
    }

    #[test]
    fn default_record_scalars() {
        let record = AssessmentRecord::default();
        assert!(record.contact_name.is_empty());
        assert!(!record.auto_needed);
        assert!(!record.home_needed);
        assert!(!record.flood_earthquake);
        assert_eq!(record.urgency, Urgency::Medium);
        assert_eq!(record.budget, Budget::Unset);
        assert_eq!(record.lead_score, 0);
        assert_eq!(record.fit_score, 0);
    }

    #[test]
    fn record_serializes_with_camel_case_wire_names() {
        let json = serde_json::to_value(AssessmentRecord::default()).unwrap();
        assert_eq!(json["contactName"], "");
        assert_eq!(json["autoNeeded"], false);
        assert_eq!(json["urgency"], "medium");
        assert_eq!(json["autoLiabilityLimits"], "");
        assert_eq!(json["homebusiness"], "");
        assert_eq!(json["safetySystemsHome"], "");
        assert_eq!(json["vehicles"][0]["primaryUse"], "");
        assert_eq!(json["drivers"][0]["defensiveDriving"], false);
        assert_eq!(json["drivers"][0]["licenseNumber"], "");
    }

    #[test]
    fn wire_enums_parse_only_their_members() {
        assert_eq!(
            LiabilityLimits::from_wire("100/300/100"),
            Some(LiabilityLimits::Limits100x300x100)
        );
        assert_eq!(PropertyType::from_wire("multi-family"), Some(PropertyType::MultiFamily));
        assert_eq!(Budget::from_wire("1000-plus"), Some(Budget::Over1000));
        assert_eq!(Ownership::from_wire(""), Some(Ownership::Unset));
        assert_eq!(Ownership::from_wire("rented"), None);
        // Urgency has no blank member.
        assert_eq!(Urgency::from_wire(""), None);
        assert_eq!(Urgency::from_wire("urgent"), Some(Urgency::Urgent));
    }

    #[test]
    fn display_matches_serde() {
        for member in Timeline::MEMBERS {
            let parsed = Timeline::from_wire(member).unwrap();
            let json = serde_json::to_string(&parsed).unwrap();
            assert_eq!(format!("\"{parsed}\""), json);
        }
    }

    #[test]
    fn missing_required_fields_tracks_contact_details() {
        let mut record = AssessmentRecord::default();
        assert_eq!(
            record.missing_required_fields(),
            vec!["contactName", "email", "phone"]
        );

        record.contact_name = "Jane Doe".into();
        record.email = "jane@example.com".into();
        record.phone = "   ".into();
        assert_eq!(record.missing_required_fields(), vec!["phone"]);

        record.phone = "555-0100".into();
        record.home_needed = true;
        assert_eq!(record.missing_required_fields(), vec!["propertyAddress"]);

        record.property_address = "1 Main St".into();
        assert!(record.missing_required_fields().is_empty());
    }

    #[test]
    fn record_serde_roundtrip_keeps_entries() {
        let mut record = AssessmentRecord::default();
        record.contact_name = "Jane Doe".into();
        record.vehicles.push(Arc::new(Vehicle {
            make: "Subaru".into(),
            ownership: Ownership::Leased,
            ..Default::default()
        }));

        let json = serde_json::to_string(&record).unwrap();
        let parsed: AssessmentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.vehicles[1].ownership, Ownership::Leased);
    }
}
