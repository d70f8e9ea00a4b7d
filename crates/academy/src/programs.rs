//! Program catalog: required hours and tuition for each program.

use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::model::Program;

/// Catalog entry for a program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgramInfo {
    /// The program.
    pub program: Program,
    /// Clock hours required to finish.
    pub hours: f64,
    /// Total tuition in dollars.
    pub price: f64,
    /// Short description.
    pub description: &'static str,
}

/// Every program the academy offers.
pub static CATALOG: [ProgramInfo; 5] = [
    ProgramInfo {
        program: Program::Esthetician,
        hours: 750.0,
        price: 7000.0,
        description: "Comprehensive skin care training",
    },
    ProgramInfo {
        program: Program::AdvancedEsthetician,
        hours: 750.0,
        price: 8770.0,
        description: "Advanced techniques and medical esthetics",
    },
    ProgramInfo {
        program: Program::Manicurist,
        hours: 600.0,
        price: 6150.0,
        description: "Complete nail technology training",
    },
    ProgramInfo {
        program: Program::EyelashTechnician,
        hours: 320.0,
        price: 3900.0,
        description: "Specialized eyelash extension training",
    },
    ProgramInfo {
        program: Program::EstheticianManicurist,
        hours: 1350.0,
        price: 9550.0,
        description: "Dual certification program",
    },
];

impl Program {
    /// Catalog entry for this program.
    #[must_use]
    pub fn info(self) -> &'static ProgramInfo {
        match self {
            Self::Esthetician => &CATALOG[0],
            Self::AdvancedEsthetician => &CATALOG[1],
            Self::Manicurist => &CATALOG[2],
            Self::EyelashTechnician => &CATALOG[3],
            Self::EstheticianManicurist => &CATALOG[4],
        }
    }
}

impl FromStr for Program {
    type Err = Error;

    /// Parse a catalog name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CATALOG
            .iter()
            .map(|info| info.program)
            .find(|program| program.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownProgram(wanted.to_string()))
    }
}
