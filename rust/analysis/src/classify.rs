// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room function classification from display names.
//!
//! Room names are free text entered by users (Korean in the shipped UI), so
//! classification is substring matching over fixed keyword sets. Match order
//! matters: "주방" contains "방", so the living/kitchen check runs before
//! the generic-room check.

use serde::Serialize;

/// The functional class of a room, derived from its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomFunction {
    Living,
    Kitchen,
    Dining,
    Bedroom,
    Bathroom,
    Storage,
    Balcony,
    Other,
}

impl RoomFunction {
    /// Classifies a room name by keyword.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

        if has(&["거실", "living"]) {
            RoomFunction::Living
        } else if has(&["주방", "부엌", "kitchen"]) {
            RoomFunction::Kitchen
        } else if has(&["식당", "dining"]) {
            RoomFunction::Dining
        } else if has(&["화장실", "욕실", "bath"]) {
            RoomFunction::Bathroom
        } else if has(&["창고", "드레스룸", "storage", "closet"]) {
            RoomFunction::Storage
        } else if has(&["발코니", "베란다", "balcon", "veranda"]) {
            RoomFunction::Balcony
        } else if has(&["침실", "방", "bed"]) {
            RoomFunction::Bedroom
        } else {
            RoomFunction::Other
        }
    }

    /// Public spaces for the public/private area ratio.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            RoomFunction::Living | RoomFunction::Kitchen | RoomFunction::Dining
        )
    }

    /// Private spaces for the public/private area ratio.
    pub fn is_private(&self) -> bool {
        matches!(self, RoomFunction::Bedroom | RoomFunction::Bathroom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_keywords() {
        assert_eq!(RoomFunction::from_name("거실"), RoomFunction::Living);
        assert_eq!(RoomFunction::from_name("주방"), RoomFunction::Kitchen);
        assert_eq!(RoomFunction::from_name("화장실"), RoomFunction::Bathroom);
        assert_eq!(RoomFunction::from_name("드레스룸"), RoomFunction::Storage);
        assert_eq!(RoomFunction::from_name("베란다"), RoomFunction::Balcony);
        assert_eq!(RoomFunction::from_name("방"), RoomFunction::Bedroom);
        assert_eq!(RoomFunction::from_name("안방"), RoomFunction::Bedroom);
    }

    #[test]
    fn kitchen_wins_over_generic_room() {
        // "주방" contains the generic-room keyword "방"; order matters.
        assert_eq!(RoomFunction::from_name("주방"), RoomFunction::Kitchen);
    }

    #[test]
    fn english_keywords() {
        assert_eq!(RoomFunction::from_name("Living Room"), RoomFunction::Living);
        assert_eq!(RoomFunction::from_name("master bedroom"), RoomFunction::Bedroom);
        assert_eq!(RoomFunction::from_name("Bathroom"), RoomFunction::Bathroom);
    }

    #[test]
    fn unknown_names_are_other() {
        assert_eq!(RoomFunction::from_name("무명 공간"), RoomFunction::Other);
    }

    #[test]
    fn public_private_split() {
        assert!(RoomFunction::Living.is_public());
        assert!(RoomFunction::Kitchen.is_public());
        assert!(!RoomFunction::Living.is_private());
        assert!(RoomFunction::Bedroom.is_private());
        assert!(RoomFunction::Bathroom.is_private());
        assert!(!RoomFunction::Balcony.is_public());
        assert!(!RoomFunction::Balcony.is_private());
    }
}
