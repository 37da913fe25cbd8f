// Structured sustainability checklist: five categories of five items each.
// Unknown item keys are rejected at deserialization; missing items default
// to NotStarted so a partial checklist degrades to a lower score.

use serde::{Deserialize, Serialize};

pub const TOTAL_ITEMS: u32 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    NotStarted,
    Planned,
    InProgress,
    Implemented,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pantry {
    pub reusable_dishware: ItemStatus,
    pub bulk_purchasing: ItemStatus,
    pub composting_bin: ItemStatus,
    pub fair_trade_supplies: ItemStatus,
    pub efficient_appliances: ItemStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Restrooms {
    pub low_flow_fixtures: ItemStatus,
    pub sensor_lighting: ItemStatus,
    pub recycled_paper: ItemStatus,
    pub eco_cleaning_products: ItemStatus,
    pub leak_inspections: ItemStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeetingRooms {
    pub paperless_meetings: ItemStatus,
    pub power_down_policy: ItemStatus,
    pub natural_lighting: ItemStatus,
    pub shared_equipment: ItemStatus,
    pub recycling_station: ItemStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Events {
    pub zero_waste_catering: ItemStatus,
    pub digital_invitations: ItemStatus,
    pub reusable_decor: ItemStatus,
    pub local_vendors: ItemStatus,
    pub waste_sorting: ItemStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Premises {
    pub led_lighting: ItemStatus,
    pub green_energy_contract: ItemStatus,
    pub bicycle_parking: ItemStatus,
    pub waste_separation: ItemStatus,
    pub indoor_planting: ItemStatus,
}

impl Pantry {
    fn statuses(&self) -> [ItemStatus; 5] {
        [
            self.reusable_dishware,
            self.bulk_purchasing,
            self.composting_bin,
            self.fair_trade_supplies,
            self.efficient_appliances,
        ]
    }
}

impl Restrooms {
    fn statuses(&self) -> [ItemStatus; 5] {
        [
            self.low_flow_fixtures,
            self.sensor_lighting,
            self.recycled_paper,
            self.eco_cleaning_products,
            self.leak_inspections,
        ]
    }
}

impl MeetingRooms {
    fn statuses(&self) -> [ItemStatus; 5] {
        [
            self.paperless_meetings,
            self.power_down_policy,
            self.natural_lighting,
            self.shared_equipment,
            self.recycling_station,
        ]
    }
}

impl Events {
    fn statuses(&self) -> [ItemStatus; 5] {
        [
            self.zero_waste_catering,
            self.digital_invitations,
            self.reusable_decor,
            self.local_vendors,
            self.waste_sorting,
        ]
    }
}

impl Premises {
    fn statuses(&self) -> [ItemStatus; 5] {
        [
            self.led_lighting,
            self.green_energy_contract,
            self.bicycle_parking,
            self.waste_separation,
            self.indoor_planting,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Checklist {
    pub pantry: Pantry,
    pub restrooms: Restrooms,
    pub meeting_rooms: MeetingRooms,
    pub events: Events,
    pub premises: Premises,
}

impl Checklist {
    pub fn implemented_items(&self) -> u32 {
        let all = self
            .pantry
            .statuses()
            .into_iter()
            .chain(self.restrooms.statuses())
            .chain(self.meeting_rooms.statuses())
            .chain(self.events.statuses())
            .chain(self.premises.statuses());
        all.filter(|s| *s == ItemStatus::Implemented).count() as u32
    }

    /// Completion percentage over the full 25-item checklist, rounded half-up.
    pub fn completion_percent(&self) -> u8 {
        let implemented = self.implemented_items();
        ((implemented * 100 + TOTAL_ITEMS / 2) / TOTAL_ITEMS) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ItemStatus::Implemented;

    fn full() -> Checklist {
        Checklist {
            pantry: Pantry {
                reusable_dishware: Implemented,
                bulk_purchasing: Implemented,
                composting_bin: Implemented,
                fair_trade_supplies: Implemented,
                efficient_appliances: Implemented,
            },
            restrooms: Restrooms {
                low_flow_fixtures: Implemented,
                sensor_lighting: Implemented,
                recycled_paper: Implemented,
                eco_cleaning_products: Implemented,
                leak_inspections: Implemented,
            },
            meeting_rooms: MeetingRooms {
                paperless_meetings: Implemented,
                power_down_policy: Implemented,
                natural_lighting: Implemented,
                shared_equipment: Implemented,
                recycling_station: Implemented,
            },
            events: Events {
                zero_waste_catering: Implemented,
                digital_invitations: Implemented,
                reusable_decor: Implemented,
                local_vendors: Implemented,
                waste_sorting: Implemented,
            },
            premises: Premises {
                led_lighting: Implemented,
                green_energy_contract: Implemented,
                bicycle_parking: Implemented,
                waste_separation: Implemented,
                indoor_planting: Implemented,
            },
        }
    }

    /// 13 implemented items: all of pantry and restrooms plus three meeting
    /// room items.
    fn thirteen() -> Checklist {
        let mut checklist = Checklist {
            pantry: full().pantry,
            restrooms: full().restrooms,
            ..Checklist::default()
        };
        checklist.meeting_rooms.paperless_meetings = Implemented;
        checklist.meeting_rooms.power_down_policy = Implemented;
        checklist.meeting_rooms.natural_lighting = Implemented;
        checklist
    }

    #[test]
    fn empty_checklist_scores_zero() {
        assert_eq!(Checklist::default().completion_percent(), 0);
    }

    #[test]
    fn full_checklist_scores_one_hundred() {
        assert_eq!(full().implemented_items(), TOTAL_ITEMS);
        assert_eq!(full().completion_percent(), 100);
    }

    #[test]
    fn thirteen_items_score_fifty_two() {
        assert_eq!(thirteen().implemented_items(), 13);
        assert_eq!(thirteen().completion_percent(), 52);
    }

    #[test]
    fn score_stays_within_bounds() {
        let mut checklist = Checklist::default();
        assert!(checklist.completion_percent() <= 100);
        checklist.premises.led_lighting = Implemented;
        assert_eq!(checklist.completion_percent(), 4);
        assert!(checklist.completion_percent() <= 100);
    }

    #[test]
    fn adding_an_item_never_lowers_the_score() {
        let before = thirteen();
        let mut after = before.clone();
        after.events.waste_sorting = Implemented;
        assert!(after.completion_percent() >= before.completion_percent());
    }

    #[test]
    fn only_implemented_carries_weight() {
        let mut checklist = Checklist::default();
        checklist.pantry.composting_bin = ItemStatus::Planned;
        checklist.restrooms.recycled_paper = ItemStatus::InProgress;
        assert_eq!(checklist.completion_percent(), 0);
    }

    #[test]
    fn field_order_in_payload_is_irrelevant() {
        let a: Checklist = serde_json::from_value(serde_json::json!({
            "pantry": { "composting_bin": "implemented", "reusable_dishware": "implemented" },
            "premises": { "led_lighting": "implemented" }
        }))
        .unwrap();
        let b: Checklist = serde_json::from_value(serde_json::json!({
            "premises": { "led_lighting": "implemented" },
            "pantry": { "reusable_dishware": "implemented", "composting_bin": "implemented" }
        }))
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.completion_percent(), b.completion_percent());
    }

    #[test]
    fn missing_categories_default_to_not_started() {
        let partial: Checklist = serde_json::from_value(serde_json::json!({
            "events": { "local_vendors": "implemented" }
        }))
        .unwrap();
        assert_eq!(partial.implemented_items(), 1);
        assert_eq!(partial.completion_percent(), 4);
    }

    #[test]
    fn unknown_item_keys_are_rejected() {
        let result: Result<Checklist, _> = serde_json::from_value(serde_json::json!({
            "pantry": { "solar_roof": "implemented" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_status_values_are_rejected() {
        let result: Result<Checklist, _> = serde_json::from_value(serde_json::json!({
            "pantry": { "composting_bin": "done" }
        }));
        assert!(result.is_err());
    }
}
