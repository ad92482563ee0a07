//! Static mapping from inspection line-item names to form slots.
//!
//! The table IS the business logic: every entry places a known line-item
//! name onto one lettered item of one form section. Lookups are exact,
//! case-sensitive string matches with no normalization. The table is a
//! declaration-ordered slice rather than a hash map because the fuzzy
//! matcher's first-qualifying-entry-wins contract depends on iteration
//! order (see [`crate::fuzzy`]).
//!
//! Many names map onto the same slot; findings that land on an
//! already-filled slot are appended as additional findings by the
//! populator, never overwritten.

/// A fixed position in the standardized form: section index (0-based over
/// the section-title markers), single-letter item code, and the item's
/// canonical title used as a locator fallback when the template's code
/// labels have drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub item_code: char,
    pub section_index: usize,
    pub canonical_title: &'static str,
}

impl SlotDescriptor {
    pub const fn new(item_code: char, section_index: usize, canonical_title: &'static str) -> Self {
        Self {
            item_code,
            section_index,
            canonical_title,
        }
    }

    /// Deduplication key for one populate run. Derived solely from the slot
    /// position, never from the matched line-item name.
    pub fn slot_key(&self) -> String {
        format!("{}_{}", self.section_index, self.item_code)
    }
}

/// Line items that are informational only and deliberately never mapped to
/// a form slot. An exact hit here skips the item without attempting a
/// fuzzy match.
pub const INFORMATIONAL_ITEMS: &[&str] = &["Report Context", "General Information"];

const fn slot(
    item_code: char,
    section_index: usize,
    canonical_title: &'static str,
) -> SlotDescriptor {
    SlotDescriptor::new(item_code, section_index, canonical_title)
}

/// Known line-item names and their form slots, in declaration order.
///
/// Section indices: 0 = Structural Systems, 1 = Electrical Systems,
/// 2 = HVAC Systems, 3 = Plumbing Systems, 4 = Appliances, 5 = Optional
/// Systems.
pub static LINE_ITEM_MAPPING: &[(&str, SlotDescriptor)] = &[
    // Structural, exterior
    ("Decks and Stairways", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Ground-Level Entry Structures", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Exterior Cladding and Trim", slot('E', 0, "Walls (Interior and Exterior)")),
    ("Exterior Wall Cladding and Finishes", slot('E', 0, "Walls (Interior and Exterior)")),
    ("Window Systems and Sealing", slot('H', 0, "Windows")),
    ("Window Systems and Flashing", slot('H', 0, "Windows")),
    ("Chimney Structures", slot('J', 0, "Fireplaces and Chimneys")),
    ("Chimney Systems", slot('J', 0, "Fireplaces and Chimneys")),
    ("Eaves and Soffit Components", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Paved Surfaces and Walkways", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Perimeter Fencing and Gates", slot('L', 0, "Other")),
    ("Exterior Elevated Structures", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Exterior Entryways", slot('G', 0, "Doors (Interior and Exterior)")),
    ("Site Grading and Drainage", slot('B', 0, "Grading and Drainage")),
    ("Grading and Drainage", slot('B', 0, "Grading and Drainage")),
    // Roof
    ("Roof Covering Materials", slot('C', 0, "Roof Covering Materials")),
    ("Roof Structures and Attics", slot('D', 0, "Roof Structures and Attics")),
    ("Overall Roof Condition", slot('C', 0, "Roof Covering Materials")),
    ("Roofing Material Integrity", slot('C', 0, "Roof Covering Materials")),
    ("Flashing System Integrity", slot('C', 0, "Roof Covering Materials")),
    ("Roof Flashing Components", slot('C', 0, "Roof Covering Materials")),
    ("Roof Penetrations and Ventilation", slot('D', 0, "Roof Structures and Attics")),
    ("Exterior Drainage Systems", slot('B', 0, "Grading and Drainage")),
    ("Rainwater Management Systems", slot('B', 0, "Grading and Drainage")),
    // HVAC
    ("Outdoor HVAC Unit", slot('B', 2, "Cooling Equipment")),
    ("Outdoor Air Conditioning Unit", slot('B', 2, "Cooling Equipment")),
    // Plumbing
    ("Exterior Water Taps and Drainage Access", slot('A', 3, "Plumbing Supply, Distribution Systems and Fixtures")),
    ("Bathtub and Shower Systems", slot('A', 3, "Plumbing Supply, Distribution Systems and Fixtures")),
    // Appliances
    ("Food Waste Disposer", slot('B', 4, "Food Waste Disposers")),
    ("Integrated Appliances", slot('I', 4, "Other")),
    ("Kitchen Ventilation", slot('C', 4, "Range Hood and Exhaust Systems")),
    ("Microwave Oven", slot('E', 4, "Microwave Ovens")),
    ("Dishwashing Unit", slot('A', 4, "Dishwashers")),
    ("Laundry Appliances", slot('H', 4, "Dryer Exhaust Systems")),
    ("Wine Refrigerator", slot('I', 4, "Other")),
    ("Refrigeration Unit", slot('I', 4, "Other")),
    // Electrical
    ("Electrical Receptacles, Switches, and Signaling Devices", slot('B', 1, "Branch Circuits, Connected Devices, and Fixtures")),
    ("Electrical Conductors and Wiring", slot('B', 1, "Branch Circuits, Connected Devices, and Fixtures")),
    // Structural, interior
    ("Interior Door Systems", slot('G', 0, "Doors (Interior and Exterior)")),
    ("Window Assemblies", slot('H', 0, "Windows")),
    ("Window Systems", slot('H', 0, "Windows")),
    ("Interior Wall Systems", slot('E', 0, "Walls (Interior and Exterior)")),
    ("Interior Flooring Surfaces", slot('F', 0, "Ceilings and Floors")),
    ("Ceiling Surfaces", slot('F', 0, "Ceilings and Floors")),
    ("Floor Coverings", slot('F', 0, "Ceilings and Floors")),
    ("Exterior Door Systems", slot('G', 0, "Doors (Interior and Exterior)")),
    ("Subflooring", slot('F', 0, "Ceilings and Floors")),
    ("Main Structural Supports", slot('A', 0, "Foundations")),
    ("Floor Joist System", slot('F', 0, "Ceilings and Floors")),
    ("General Structural Information", slot('A', 0, "Foundations")),
    ("Substructure Entry", slot('A', 0, "Foundations")),
    ("Outdoor Living Area Covers", slot('K', 0, "Porches, Balconies, Decks, and Carports")),
    ("Exterior Plantings", slot('L', 0, "Other")),
    ("Landscape Retaining Structures", slot('B', 0, "Grading and Drainage")),
    // HVAC, interior
    ("Indoor HVAC Unit", slot('A', 2, "Heating Equipment")),
    // Catch-alls
    ("Crawlspace Assessment", slot('L', 0, "Other")),
    ("Interior Cabinetry and Countertops", slot('L', 0, "Other")),
    ("Interior Passageways", slot('L', 0, "Other")),
    ("Site and Property Context", slot('B', 0, "Grading and Drainage")),
];

/// Exact, case-sensitive table lookup.
pub fn exact_match(name: &str) -> Option<&'static SlotDescriptor> {
    LINE_ITEM_MAPPING
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, slot)| slot)
}

/// Whether the name is on the informational skip list.
pub fn is_informational(name: &str) -> bool {
    INFORMATIONAL_ITEMS.contains(&name)
}
