//! Thermomix TM6 operating envelope used to ground the conversion prompt.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSetting {
    /// Value used in `settings.speed`.
    pub label: &'static str,
    pub rpm: u32,
    pub purpose: &'static str,
}

impl SpeedSetting {
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.label {
            "Wooden Spoon" | "Turbo" => self.label.to_owned(),
            n => format!("Speed {n}"),
        }
    }
}

pub const SPEED_TABLE: [SpeedSetting; 12] = [
    SpeedSetting {
        label: "Wooden Spoon",
        rpm: 40,
        purpose: "gentle stirring, no chopping",
    },
    SpeedSetting {
        label: "1",
        rpm: 100,
        purpose: "gentle mixing",
    },
    SpeedSetting {
        label: "2",
        rpm: 200,
        purpose: "light mixing",
    },
    SpeedSetting {
        label: "3",
        rpm: 500,
        purpose: "soft stirring/light chopping",
    },
    SpeedSetting {
        label: "4",
        rpm: 1100,
        purpose: "coarse chopping",
    },
    SpeedSetting {
        label: "5",
        rpm: 2000,
        purpose: "medium chopping/mixing",
    },
    SpeedSetting {
        label: "6",
        rpm: 3100,
        purpose: "fine chopping",
    },
    SpeedSetting {
        label: "7",
        rpm: 4400,
        purpose: "very fine chopping",
    },
    SpeedSetting {
        label: "8",
        rpm: 5800,
        purpose: "blending",
    },
    SpeedSetting {
        label: "9",
        rpm: 7300,
        purpose: "smooth blending",
    },
    SpeedSetting {
        label: "10",
        rpm: 8800,
        purpose: "pulverizing",
    },
    SpeedSetting {
        label: "Turbo",
        rpm: 10_700,
        purpose: "maximum speed, short bursts only",
    },
];

pub const MANUAL_TEMP_MIN_C: u32 = 37;
pub const MANUAL_TEMP_MAX_C: u32 = 160;
pub const GUIDED_TEMP_MAX_C: u32 = 180;
pub const VAROMA_TEMP_C: u32 = 120;

pub const RULES: [&str; 7] = [
    "Use Speed 1-3 for gentle stirring without chopping",
    "Use Speed 4-7 for chopping (4=coarse, 7=fine)",
    "Use Speed 8-10 for blending and smooth textures",
    "Turbo only for hard ingredients in short bursts (0.5-2 sec)",
    "No heating above Speed 6 (heating automatically disabled)",
    "Reverse mode available at any speed for gentle mixing",
    "MC (Measuring Cup) must be on unless adding ingredients",
];
