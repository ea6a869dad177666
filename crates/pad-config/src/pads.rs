//! Per-pad settings: `[Mappings] PADn` and the sections they name.
//!
//! # Numbering (for beginners)
//!
//! Button numbers in the profile are 1-based because `0` means "unmapped".
//! In memory every button becomes `Option<u16>` holding the 0-based index,
//! so `A=1` loads as `Some(0)` and `A=0` (or a missing key) as `None`.
//!
//! # Pad states
//!
//! | `PassThrough` | both GUIDs set | result                          |
//! |---------------|----------------|---------------------------------|
//! | true (default)| any            | kept, `enabled = false`         |
//! | false         | yes            | kept, fully read, `enabled`     |
//! | false         | no             | skipped                         |

use ini_core::domain::numeric::parse_profile_int;
use ini_core::{ConfigStore, ProfileBackend};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Section whose `PAD1`..`PAD4` keys name the per-pad sections.
pub const MAPPINGS_SECTION: &str = "Mappings";

/// Number of pad slots an emulator profile can map.
pub const PAD_SLOTS: usize = 4;

/// Upper bound for an axis anti-dead-zone.
pub const MAX_ANTI_DEAD_ZONE: i64 = 32_767;

/// Button keys, in controller report order.
pub const BUTTON_NAMES: [&str; 10] = [
    "A",
    "B",
    "X",
    "Y",
    "Left Shoulder",
    "Right Shoulder",
    "Back",
    "Start",
    "Left Thumb",
    "Right Thumb",
];

/// D-pad direction keys.
pub const POV_NAMES: [&str; 4] = ["D-pad Up", "D-pad Down", "D-pad Left", "D-pad Right"];

/// Thumbstick axis keys.  Tuning keys append ` DeadZone`, ` AntiDeadZone`
/// or ` Linear`; digital bindings append `+ Button` / `- Button`.
pub const AXIS_NAMES: [&str; 4] = [
    "Left Analog X",
    "Left Analog Y",
    "Right Analog X",
    "Right Analog Y",
];

/// Trigger keys; the button binding appends ` But`.
pub const TRIGGER_NAMES: [&str; 2] = ["Left Trigger", "Right Trigger"];

// ── Device settings ───────────────────────────────────────────────────────────

/// Force-feedback tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForceFeedback {
    pub ffb_type: u8,
    /// `ForcePercent` scaled to a fraction (`100` → `1.0`).
    pub force_percent: f32,
    pub left_period: i32,
    pub right_period: i32,
}

impl Default for ForceFeedback {
    fn default() -> Self {
        Self {
            ffb_type: 0,
            force_percent: 1.0,
            left_period: 60,
            right_period: 20,
        }
    }
}

/// Per-axis response tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AxisTuning {
    pub dead_zone: i16,
    /// Clamped to `0..=32767`.
    pub anti_dead_zone: i16,
    pub linear: i16,
}

/// Physical-device options of one pad section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSettings {
    pub use_product_guid: bool,
    pub swap_motor: bool,
    pub trigger_dead_zone: i32,
    pub use_force_feedback: bool,
    pub controller_type: u8,
    pub axis_to_dpad: bool,
    pub axis_to_dpad_dead_zone: i32,
    pub axis_to_dpad_offset: i32,
    pub force_feedback: ForceFeedback,
    pub axes: [AxisTuning; 4],
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            use_product_guid: false,
            swap_motor: false,
            trigger_dead_zone: 0,
            use_force_feedback: false,
            controller_type: 1,
            axis_to_dpad: false,
            axis_to_dpad_dead_zone: 0,
            axis_to_dpad_offset: 0,
            force_feedback: ForceFeedback::default(),
            axes: [AxisTuning::default(); 4],
        }
    }
}

impl DeviceSettings {
    pub fn load<B: ProfileBackend>(store: &ConfigStore<B>, section: &str) -> Self {
        let long = |key: &str, default: i64| store.get_long(section, key, default);
        let flag = |key: &str| store.get_bool(section, key, false);

        let mut axes = [AxisTuning::default(); 4];
        for (tuning, axis) in axes.iter_mut().zip(AXIS_NAMES) {
            tuning.dead_zone = long(&format!("{axis} DeadZone"), 0) as i16;
            tuning.anti_dead_zone =
                long(&format!("{axis} AntiDeadZone"), 0).clamp(0, MAX_ANTI_DEAD_ZONE) as i16;
            tuning.linear = long(&format!("{axis} Linear"), 0) as i16;
        }

        Self {
            use_product_guid: flag("UseProductGUID"),
            swap_motor: flag("SwapMotor"),
            trigger_dead_zone: long("TriggerDeadzone", 0) as i32,
            use_force_feedback: flag("UseForceFeedback"),
            controller_type: long("ControllerType", 1) as u8,
            axis_to_dpad: flag("AxisToDPad"),
            axis_to_dpad_dead_zone: long("AxisToDPadDeadZone", 0) as i32,
            axis_to_dpad_offset: long("AxisToDPadOffset", 0) as i32,
            force_feedback: ForceFeedback {
                ffb_type: long("FFBType", 0) as u8,
                force_percent: long("ForcePercent", 100) as f32 / 100.0,
                left_period: long("LeftMotorPeriod", 60) as i32,
                right_period: long("RightMotorPeriod", 20) as i32,
            },
            axes,
        }
    }
}

// ── Input mapping ─────────────────────────────────────────────────────────────

/// What a D-pad direction is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PovTarget {
    /// 0-based device button.
    Button(u16),
    /// POV hat angle in hundredths of a degree.
    Angle(u16),
}

impl PovTarget {
    /// Parses a D-pad binding: `1..=99` is a 1-based button, `100` and up an
    /// angle, and a non-numeric value a direction word (`UP`, `DOWN`, `LEFT`,
    /// `RIGHT`).  Negative numbers leave the direction unmapped.
    pub fn parse(raw: &str) -> Option<Self> {
        let number = parse_profile_int(raw).unwrap_or(0);
        match number {
            0 => {
                let upper = raw.to_ascii_uppercase();
                [("UP", 36_000), ("DOWN", 18_000), ("LEFT", 27_000), ("RIGHT", 9_000)]
                    .into_iter()
                    .filter(|(word, _)| upper.contains(word))
                    .last()
                    .map(|(_, angle)| PovTarget::Angle(angle))
            }
            1..=99 => Some(PovTarget::Button(number as u16 - 1)),
            n if n >= 100 => u16::try_from(n).ok().map(PovTarget::Angle),
            _ => None,
        }
    }
}

/// Kind of analog source driving a thumbstick axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    #[default]
    Unmapped,
    Axis,
    Slider,
}

/// Binding of one thumbstick axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AxisSource {
    pub kind: AxisKind,
    pub id: i32,
    /// 0-based button that pushes the axis to its positive end.
    pub positive_button: Option<u16>,
    /// 0-based button that pushes the axis to its negative end.
    pub negative_button: Option<u16>,
}

impl AxisSource {
    /// Parses an axis binding: `s<n>` selects slider `n`, anything else axis
    /// `n`.  An empty value leaves the axis unmapped.
    pub fn parse(raw: &str) -> Self {
        let mut source = Self::default();
        if raw.is_empty() {
            return source;
        }
        let (kind, rest) = match raw.strip_prefix(['s', 'S']) {
            Some(rest) => (AxisKind::Slider, rest),
            None => (AxisKind::Axis, raw),
        };
        source.kind = kind;
        source.id = clamp_i32(parse_profile_int(rest).unwrap_or(0));
        source
    }

    pub fn has_digital(&self) -> bool {
        self.positive_button.is_some() || self.negative_button.is_some()
    }
}

/// Kind of source driving a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Digital,
    Axis,
    Slider,
    HalfAxis,
    HalfSlider,
    ComboButton,
}

impl TriggerKind {
    fn from_prefix(first: char) -> Self {
        match first.to_ascii_lowercase() {
            'a' => TriggerKind::Axis,
            's' => TriggerKind::Slider,
            'x' => TriggerKind::HalfAxis,
            'h' => TriggerKind::HalfSlider,
            'z' => TriggerKind::ComboButton,
            _ => TriggerKind::Digital,
        }
    }
}

/// Binding of one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerSource {
    pub kind: TriggerKind,
    /// 0-based button for [`TriggerKind::Digital`], source index otherwise.
    pub id: i32,
}

impl TriggerSource {
    /// Parses a trigger binding.  A letter prefix (`a`, `s`, `x`, `h`, `z`)
    /// selects the source kind; a bare number is a 1-based button.
    pub fn parse(raw: &str) -> Option<Self> {
        let first = raw.chars().next()?;
        let kind = TriggerKind::from_prefix(first);
        let id = match kind {
            TriggerKind::Digital => {
                clamp_i32(parse_profile_int(raw).unwrap_or(0)).saturating_sub(1)
            }
            _ => clamp_i32(parse_profile_int(&raw[first.len_utf8()..]).unwrap_or(0)),
        };
        Some(Self { kind, id })
    }
}

/// Controller-input bindings of one pad section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PadMapping {
    pub guide_button: u16,
    pub buttons: [Option<u16>; 10],
    pub povs: [Option<PovTarget>; 4],
    pub axes: [AxisSource; 4],
    pub triggers: [Option<TriggerSource>; 2],
    /// 0-based button bound with each trigger's ` But` key.
    pub trigger_buttons: [Option<u16>; 2],
    /// 0-based POV hat used as the D-pad.
    pub dpad_pov: Option<u16>,
}

impl PadMapping {
    pub fn load<B: ProfileBackend>(store: &ConfigStore<B>, section: &str) -> Self {
        let long = |key: &str| store.get_long(section, key, 0);
        let text = |key: &str| store.get_value_or_empty(section, key);

        let mut mapping = Self {
            guide_button: long("GuideButton") as u16,
            dpad_pov: one_based(long("D-pad POV")),
            ..Self::default()
        };

        for (slot, name) in mapping.buttons.iter_mut().zip(BUTTON_NAMES) {
            *slot = one_based(long(name));
        }
        for (slot, name) in mapping.povs.iter_mut().zip(POV_NAMES) {
            *slot = PovTarget::parse(&text(name));
        }
        for (axis, name) in mapping.axes.iter_mut().zip(AXIS_NAMES) {
            *axis = AxisSource {
                positive_button: one_based(long(&format!("{name}+ Button"))),
                negative_button: one_based(long(&format!("{name}- Button"))),
                ..AxisSource::parse(&text(name))
            };
        }
        for (i, name) in TRIGGER_NAMES.into_iter().enumerate() {
            mapping.triggers[i] = TriggerSource::parse(&text(name));
            mapping.trigger_buttons[i] = one_based(long(&format!("{name} But")));
        }

        mapping
    }
}

// ── Pad ───────────────────────────────────────────────────────────────────────

/// One mapped pad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadSettings {
    /// 0-based player slot (`PAD1` is slot 0).
    pub slot: u8,
    /// Section the `PADn` entry points at.
    pub section: String,
    pub product_guid: Uuid,
    pub instance_guid: Uuid,
    pub pass_through: bool,
    /// `false` for pass-through pads.
    pub enabled: bool,
    pub device: DeviceSettings,
    pub mapping: PadMapping,
}

impl PadSettings {
    /// Loads the pad in `slot` (0-based), or `None` if the slot is unmapped
    /// or its section lacks device GUIDs.
    pub fn load_slot<B: ProfileBackend>(store: &ConfigStore<B>, slot: u8) -> Option<Self> {
        let key = format!("PAD{}", slot + 1);
        let section = store.get_value_or_empty(MAPPINGS_SECTION, &key);
        if section.is_empty() {
            return None;
        }

        let product_guid = parse_guid(&store.get_value_or_empty(&section, "ProductGUID"));
        let instance_guid = parse_guid(&store.get_value_or_empty(&section, "InstanceGUID"));
        let pass_through = store.get_bool(&section, "PassThrough", true);

        if pass_through {
            debug!(slot, section = %section, "pad is pass-through");
            return Some(Self {
                slot,
                section,
                product_guid,
                instance_guid,
                pass_through,
                enabled: false,
                device: DeviceSettings::default(),
                mapping: PadMapping::default(),
            });
        }

        if product_guid.is_nil() || instance_guid.is_nil() {
            warn!(slot, section = %section, "pad section has no device GUIDs, skipping");
            return None;
        }

        debug!(slot, section = %section, "pad loaded");
        Some(Self {
            device: DeviceSettings::load(store, &section),
            mapping: PadMapping::load(store, &section),
            slot,
            section,
            product_guid,
            instance_guid,
            pass_through,
            enabled: true,
        })
    }

    /// Loads every mapped slot in order.
    pub fn load_all<B: ProfileBackend>(store: &ConfigStore<B>) -> Vec<Self> {
        (0..PAD_SLOTS as u8)
            .filter_map(|slot| Self::load_slot(store, slot))
            .collect()
    }
}

/// Parses a device GUID, with or without braces.  Anything unparsable is the
/// nil GUID.
pub fn parse_guid(raw: &str) -> Uuid {
    let raw = raw.trim();
    let bare = raw
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(raw);
    Uuid::parse_str(bare).unwrap_or_else(|_| Uuid::nil())
}

/// Saturates a profile number into the `i32` range.
fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Converts a 1-based profile number to a 0-based index; `<= 0` is unmapped.
fn one_based(value: i64) -> Option<u16> {
    (value > 0).then(|| (value - 1) as u16)
}
