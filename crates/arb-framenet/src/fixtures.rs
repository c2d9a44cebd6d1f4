//! Synthetic corpus shared by tests across the workspace.
//!
//! Shape: a parentless frame (`Giving`) with one child (`Commerce_sell`), a
//! two-level chain (`Renting` → `Commerce_buy` → `Getting`), a frame with no
//! core elements, a frame whose relations are all malformed, and a two-frame
//! inheritance cycle.

use crate::memory::InMemoryCorpus;

pub const SYNTHETIC_CORPUS_JSON: &str = include_str!("../testdata/synthetic_corpus.json");

pub mod ids {
    use crate::model::{ElementId, FrameId, LexicalUnitId};

    pub const GETTING: FrameId = 122;
    pub const GIVING: FrameId = 139;
    pub const COMMERCE_BUY: FrameId = 171;
    pub const COMMERCE_SELL: FrameId = 234;
    pub const RENTING: FrameId = 412;
    pub const NO_CORE: FrameId = 500;
    pub const MALFORMED: FrameId = 600;
    pub const CYCLE_A: FrameId = 900;
    pub const CYCLE_B: FrameId = 901;

    pub const GIVING_DONOR: ElementId = 1052;
    pub const GIVING_THEME: ElementId = 1053;
    pub const GIVING_RECIPIENT: ElementId = 1054;
    pub const GETTING_RECIPIENT: ElementId = 1200;
    pub const GETTING_THEME: ElementId = 1201;
    pub const COMMERCE_BUY_BUYER: ElementId = 1300;
    pub const COMMERCE_BUY_GOODS: ElementId = 1301;
    pub const RENTING_LESSEE: ElementId = 1400;

    pub const LU_GIVE: LexicalUnitId = 5001;
    pub const LU_BUY: LexicalUnitId = 5004;
    pub const LU_RENT: LexicalUnitId = 5006;
}

pub fn synthetic_corpus() -> InMemoryCorpus {
    InMemoryCorpus::from_json_str(SYNTHETIC_CORPUS_JSON)
        .expect("synthetic corpus fixture must load")
}
