//! HealthKit enumeration tables
//!
//! Each table lists the raw values HealthKit defines for one enumeration, the
//! case name, and the human readable description written into observations.
//! Tables also produce codings in a per-enumeration HealthKit code system.

use crate::domain::errors::ConversionError;
use crate::domain::record::Coding;
use crate::domain::result::ConversionResult;

/// Code system prefix for enumeration codings
pub const ENUM_SYSTEM_PREFIX: &str = "https://developer.apple.com/documentation/healthkit/";

/// Returned for forward-compatible enumerations when a raw value is unknown
pub const UNKNOWN_CASE: &str = "unknown";

/// One case of an enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumCase {
    pub raw: i64,
    pub name: &'static str,
    pub description: &'static str,
}

/// A closed HealthKit enumeration
#[derive(Debug)]
pub struct EnumTable {
    pub type_name: &'static str,
    pub cases: &'static [EnumCase],
}

impl EnumTable {
    /// Finds the case for a raw value
    pub fn case(&self, raw: i64) -> Option<&'static EnumCase> {
        self.cases.iter().find(|c| c.raw == raw)
    }

    /// Description of a raw value
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidValue`] for a raw value outside the table.
    pub fn describe(&self, raw: i64) -> ConversionResult<&'static str> {
        self.case(raw).map(|c| c.description).ok_or_else(|| {
            ConversionError::invalid_value(format!("{raw} is not a valid {}", self.type_name))
        })
    }

    /// Case name of a raw value
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidValue`] for a raw value outside the table.
    pub fn case_name(&self, raw: i64) -> ConversionResult<&'static str> {
        self.case(raw).map(|c| c.name).ok_or_else(|| {
            ConversionError::invalid_value(format!("{raw} is not a valid {}", self.type_name))
        })
    }

    /// Description of a raw value, or `"unknown"` for values added after this table
    pub fn describe_or_unknown(&self, raw: i64) -> &'static str {
        self.case(raw).map_or(UNKNOWN_CASE, |c| c.description)
    }

    /// Code system URI for this enumeration
    pub fn system(&self) -> String {
        format!("{ENUM_SYSTEM_PREFIX}{}", self.type_name.to_lowercase())
    }

    /// Coding for a raw value: code is the raw value, display is derived from the case name
    pub fn coding(&self, raw: i64) -> Option<Coding> {
        self.case(raw)
            .map(|c| Coding::new(self.system(), raw.to_string(), display_text(c.name)))
    }
}

/// Splits a camel-case case name into words
///
/// Upper-case runs are kept as they are, so `asleepREM` becomes `asleep REM`
/// and `luteinizingHormoneSurge` becomes `luteinizing hormone surge`.
pub fn display_text(case_name: &str) -> String {
    let chars: Vec<char> = case_name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && chars[i - 1].is_lowercase() && c.is_uppercase() {
            words.push(std::mem::take(&mut current));
        }
        current.push(*c);
    }
    words.push(current);
    words
        .into_iter()
        .map(|w| {
            if w.chars().all(|c| !c.is_lowercase()) {
                w
            } else {
                w.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

macro_rules! enum_table {
    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident = $type_name:literal {
            $($raw:literal => $case:literal $(: $desc:literal)?,)+
        }
    ) => {
        $(#[$meta])*
        $vis static $name: EnumTable = EnumTable {
            type_name: $type_name,
            cases: &[
                $(EnumCase {
                    raw: $raw,
                    name: $case,
                    description: enum_table!(@desc $case $(, $desc)?),
                },)+
            ],
        };
    };
    (@desc $case:literal) => { $case };
    (@desc $case:literal, $desc:literal) => { $desc };
}

// Category values

enum_table! {
    pub static SLEEP_ANALYSIS = "HKCategoryValueSleepAnalysis" {
        0 => "inBed": "in bed",
        1 => "asleepUnspecified": "asleep unspecified",
        2 => "awake",
        3 => "asleepCore": "asleep core",
        4 => "asleepDeep": "asleep deep",
        5 => "asleepREM": "asleep REM",
    }
}

enum_table! {
    pub static SEVERITY = "HKCategoryValueSeverity" {
        0 => "unspecified",
        1 => "notPresent": "not present",
        2 => "mild",
        3 => "moderate",
        4 => "severe",
    }
}

enum_table! {
    pub static PRESENCE = "HKCategoryValuePresence" {
        0 => "present",
        1 => "notPresent": "not present",
    }
}

enum_table! {
    pub static MENSTRUAL_FLOW = "HKCategoryValueMenstrualFlow" {
        1 => "unspecified",
        2 => "light",
        3 => "medium",
        4 => "heavy",
        5 => "none",
    }
}

enum_table! {
    pub static VAGINAL_BLEEDING = "HKCategoryValueVaginalBleeding" {
        1 => "unspecified",
        2 => "light",
        3 => "medium",
        4 => "heavy",
        5 => "none",
    }
}

enum_table! {
    pub static CERVICAL_MUCUS_QUALITY = "HKCategoryValueCervicalMucusQuality" {
        1 => "dry",
        2 => "sticky",
        3 => "creamy",
        4 => "watery",
        5 => "eggWhite",
    }
}

enum_table! {
    pub static OVULATION_TEST_RESULT = "HKCategoryValueOvulationTestResult" {
        1 => "negative",
        2 => "luteinizingHormoneSurge": "luteinizing hormone surge",
        3 => "indeterminate",
        4 => "estrogenSurge": "estrogen surge",
    }
}

enum_table! {
    pub static CONTRACEPTIVE = "HKCategoryValueContraceptive" {
        1 => "unspecified",
        2 => "implant",
        3 => "injection",
        4 => "intrauterineDevice": "intrauterine device",
        5 => "intravaginalRing": "intravaginal ring",
        6 => "oral",
        7 => "patch",
    }
}

enum_table! {
    pub static APPETITE_CHANGES = "HKCategoryValueAppetiteChanges" {
        0 => "unspecified",
        1 => "noChange": "no change",
        2 => "decreased",
        3 => "increased",
    }
}

enum_table! {
    pub static ENVIRONMENTAL_AUDIO_EXPOSURE_EVENT = "HKCategoryValueEnvironmentalAudioExposureEvent" {
        1 => "momentaryLimit": "momentary limit",
    }
}

enum_table! {
    pub static HEADPHONE_AUDIO_EXPOSURE_EVENT = "HKCategoryValueHeadphoneAudioExposureEvent" {
        1 => "sevenDayLimit": "seven day limit",
    }
}

enum_table! {
    pub static LOW_CARDIO_FITNESS_EVENT = "HKCategoryValueLowCardioFitnessEvent" {
        1 => "lowFitness": "low fitness",
    }
}

enum_table! {
    pub static APPLE_WALKING_STEADINESS_EVENT = "HKCategoryValueAppleWalkingSteadinessEvent" {
        1 => "initialLow": "initial low",
        2 => "initialVeryLow": "initial very low",
        3 => "repeatLow": "repeat low",
        4 => "repeatVeryLow": "repeat very low",
    }
}

enum_table! {
    pub static PREGNANCY_TEST_RESULT = "HKCategoryValuePregnancyTestResult" {
        1 => "negative",
        2 => "positive",
        3 => "indeterminate",
    }
}

enum_table! {
    pub static PROGESTERONE_TEST_RESULT = "HKCategoryValueProgesteroneTestResult" {
        1 => "negative",
        2 => "positive",
        3 => "indeterminate",
    }
}

enum_table! {
    pub static APPLE_STAND_HOUR = "HKCategoryValueAppleStandHour" {
        0 => "stood",
        1 => "idle",
    }
}

// Electrocardiogram

enum_table! {
    pub static ECG_CLASSIFICATION = "HKElectrocardiogramClassification" {
        0 => "notSet",
        1 => "sinusRhythm",
        2 => "atrialFibrillation",
        3 => "inconclusiveLowHeartRate",
        4 => "inconclusiveHighHeartRate",
        5 => "inconclusivePoorReading",
        6 => "inconclusiveOther",
        100 => "unrecognized",
    }
}

enum_table! {
    pub static ECG_SYMPTOMS_STATUS = "HKElectrocardiogramSymptomsStatus" {
        0 => "notSet",
        1 => "none",
        2 => "present",
    }
}

// State of mind

enum_table! {
    pub static STATE_OF_MIND_KIND = "HKStateOfMindKind" {
        1 => "momentaryEmotion": "momentary emotion",
        2 => "dailyMood": "daily mood",
    }
}

enum_table! {
    pub static VALENCE_CLASSIFICATION = "HKStateOfMindValenceClassification" {
        1 => "veryUnpleasant": "very unpleasant",
        2 => "unpleasant",
        3 => "slightlyUnpleasant": "slightly unpleasant",
        4 => "neutral",
        5 => "slightlyPleasant": "slightly pleasant",
        6 => "pleasant",
        7 => "veryPleasant": "very pleasant",
    }
}

enum_table! {
    pub static STATE_OF_MIND_LABEL = "HKStateOfMindLabel" {
        1 => "amazed",
        2 => "amused",
        3 => "angry",
        4 => "anxious",
        5 => "ashamed",
        6 => "brave",
        7 => "calm",
        8 => "content",
        9 => "disappointed",
        10 => "discouraged",
        11 => "disgusted",
        12 => "embarrassed",
        13 => "excited",
        14 => "frustrated",
        15 => "grateful",
        16 => "guilty",
        17 => "happy",
        18 => "hopeless",
        19 => "irritated",
        20 => "jealous",
        21 => "joyful",
        22 => "lonely",
        23 => "passionate",
        24 => "peaceful",
        25 => "proud",
        26 => "relieved",
        27 => "sad",
        28 => "scared",
        29 => "stressed",
        30 => "surprised",
        31 => "worried",
        32 => "annoyed",
        33 => "confident",
        34 => "drained",
        35 => "hopeful",
        36 => "indifferent",
        37 => "overwhelmed",
        38 => "satisfied",
    }
}

enum_table! {
    pub static STATE_OF_MIND_ASSOCIATION = "HKStateOfMindAssociation" {
        1 => "community",
        2 => "currentEvents",
        3 => "dating",
        4 => "education",
        5 => "family",
        6 => "fitness",
        7 => "friends",
        8 => "health",
        9 => "hobbies",
        10 => "identity",
        11 => "money",
        12 => "partner",
        13 => "selfCare",
        14 => "spirituality",
        15 => "tasks",
        16 => "travel",
        17 => "work",
        18 => "weather",
    }
}

// Workout

enum_table! {
    pub static WORKOUT_ACTIVITY_TYPE = "HKWorkoutActivityType" {
        1 => "americanFootball",
        2 => "archery",
        3 => "australianFootball",
        4 => "badminton",
        5 => "baseball",
        6 => "basketball",
        7 => "bowling",
        8 => "boxing",
        9 => "climbing",
        10 => "cricket",
        11 => "crossTraining",
        12 => "curling",
        13 => "cycling",
        14 => "dance",
        15 => "danceInspiredTraining",
        16 => "elliptical",
        17 => "equestrianSports",
        18 => "fencing",
        19 => "fishing",
        20 => "functionalStrengthTraining",
        21 => "golf",
        22 => "gymnastics",
        23 => "handball",
        24 => "hiking",
        25 => "hockey",
        26 => "hunting",
        27 => "lacrosse",
        28 => "martialArts",
        29 => "mindAndBody",
        30 => "mixedMetabolicCardioTraining",
        31 => "paddleSports",
        32 => "play",
        33 => "preparationAndRecovery",
        34 => "racquetball",
        35 => "rowing",
        36 => "rugby",
        37 => "running",
        38 => "sailing",
        39 => "skatingSports",
        40 => "snowSports",
        41 => "soccer",
        42 => "softball",
        43 => "squash",
        44 => "stairClimbing",
        45 => "surfingSports",
        46 => "swimming",
        47 => "tableTennis",
        48 => "tennis",
        49 => "trackAndField",
        50 => "traditionalStrengthTraining",
        51 => "volleyball",
        52 => "walking",
        53 => "waterFitness",
        54 => "waterPolo",
        55 => "waterSports",
        56 => "wrestling",
        57 => "yoga",
        58 => "barre",
        59 => "coreTraining",
        60 => "crossCountrySkiing",
        61 => "downhillSkiing",
        62 => "flexibility",
        63 => "highIntensityIntervalTraining",
        64 => "jumpRope",
        65 => "kickboxing",
        66 => "pilates",
        67 => "snowboarding",
        68 => "stairs",
        69 => "stepTraining",
        70 => "wheelchairWalkPace",
        71 => "wheelchairRunPace",
        72 => "taiChi",
        73 => "mixedCardio",
        74 => "handCycling",
        75 => "discSports",
        76 => "fitnessGaming",
        77 => "cardioDance",
        78 => "socialDance",
        79 => "pickleball",
        80 => "cooldown": "coolDown",
        82 => "swimBikeRun",
        83 => "transition",
        84 => "underwaterDiving",
        3000 => "other",
    }
}

// Metadata enumerations

enum_table! {
    pub static APPLE_ECG_ALGORITHM_VERSION = "HKAppleECGAlgorithmVersion" {
        1 => "version1",
        2 => "version2",
    }
}

enum_table! {
    pub static BLOOD_GLUCOSE_MEAL_TIME = "HKBloodGlucoseMealTime" {
        1 => "preprandial",
        2 => "postprandial",
    }
}

enum_table! {
    pub static BODY_TEMPERATURE_SENSOR_LOCATION = "HKBodyTemperatureSensorLocation" {
        0 => "other",
        1 => "armpit",
        2 => "body",
        3 => "ear",
        4 => "finger",
        5 => "gastroIntestinal",
        6 => "mouth",
        7 => "rectum",
        8 => "toe",
        9 => "earDrum",
        10 => "temporalArtery",
        11 => "forehead",
    }
}

enum_table! {
    pub static CYCLING_FTP_TEST_TYPE = "HKCyclingFunctionalThresholdPowerTestType" {
        1 => "maxExercise60Minute",
        2 => "maxExercise20Minute",
        3 => "rampTest",
        4 => "predictionExercise",
    }
}

enum_table! {
    pub static DEVICE_PLACEMENT_SIDE = "HKDevicePlacementSide" {
        0 => "unknown",
        1 => "left",
        2 => "right",
        3 => "central",
    }
}

enum_table! {
    pub static HEART_RATE_MOTION_CONTEXT = "HKHeartRateMotionContext" {
        0 => "notSet",
        1 => "sedentary",
        2 => "active",
    }
}

enum_table! {
    pub static HEART_RATE_RECOVERY_TEST_TYPE = "HKHeartRateRecoveryTestType" {
        1 => "maxExercise",
        2 => "predictionSubMaxExercise",
        3 => "predictionNonExercise",
    }
}

enum_table! {
    pub static HEART_RATE_SENSOR_LOCATION = "HKHeartRateSensorLocation" {
        0 => "other",
        1 => "chest",
        2 => "wrist",
        3 => "finger",
        4 => "hand",
        5 => "earLobe",
        6 => "foot",
    }
}

enum_table! {
    pub static INSULIN_DELIVERY_REASON = "HKInsulinDeliveryReason" {
        1 => "basal",
        2 => "bolus",
    }
}

enum_table! {
    pub static PHYSICAL_EFFORT_ESTIMATION_TYPE = "HKPhysicalEffortEstimationType" {
        1 => "activityLookup",
        2 => "deviceSensed",
    }
}

enum_table! {
    pub static SWIMMING_STROKE_STYLE = "HKSwimmingStrokeStyle" {
        0 => "unknown",
        1 => "mixed",
        2 => "freestyle",
        3 => "backstroke",
        4 => "breaststroke",
        5 => "butterfly",
        6 => "kickboard",
    }
}

enum_table! {
    pub static USER_MOTION_CONTEXT = "HKUserMotionContext" {
        0 => "notSet",
        1 => "stationary",
        2 => "active",
    }
}

enum_table! {
    pub static VO2_MAX_TEST_TYPE = "HKVO2MaxTestType" {
        1 => "maxExercise",
        2 => "predictionSubMaxExercise",
        3 => "predictionNonExercise",
        4 => "predictionStepTest",
    }
}

enum_table! {
    pub static WATER_SALINITY = "HKWaterSalinity" {
        1 => "freshWater",
        2 => "saltWater",
    }
}

enum_table! {
    pub static WEATHER_CONDITION = "HKWeatherCondition" {
        0 => "none",
        1 => "clear",
        2 => "fair",
        3 => "partlyCloudy",
        4 => "mostlyCloudy",
        5 => "cloudy",
        6 => "foggy",
        7 => "haze",
        8 => "windy",
        9 => "blustery",
        10 => "smoky",
        11 => "dust",
        12 => "snow",
        13 => "hail",
        14 => "sleet",
        15 => "freezingDrizzle",
        16 => "freezingRain",
        17 => "mixedRainAndHail",
        18 => "mixedRainAndSnow",
        19 => "mixedRainAndSleet",
        20 => "mixedSnowAndSleet",
        21 => "drizzle",
        22 => "scatteredShowers",
        23 => "showers",
        24 => "thunderstorms",
        25 => "tropicalStorm",
        26 => "hurricane",
        27 => "tornado",
    }
}

enum_table! {
    pub static SWIMMING_LOCATION_TYPE = "HKWorkoutSwimmingLocationType" {
        0 => "unknown",
        1 => "pool",
        2 => "openWater",
    }
}

/// Enumeration carried by a metadata key, if the key is enum-valued
pub fn metadata_enum(key: &str) -> Option<&'static EnumTable> {
    let table = match key {
        "HKMetadataKeyAppleECGAlgorithmVersion" => &APPLE_ECG_ALGORITHM_VERSION,
        "HKMetadataKeyBloodGlucoseMealTime" => &BLOOD_GLUCOSE_MEAL_TIME,
        "HKMetadataKeyBodyTemperatureSensorLocation" => &BODY_TEMPERATURE_SENSOR_LOCATION,
        "HKMetadataKeyCyclingFunctionalThresholdPowerTestType" => &CYCLING_FTP_TEST_TYPE,
        "HKMetadataKeyDevicePlacementSide" => &DEVICE_PLACEMENT_SIDE,
        "HKMetadataKeyHeartRateMotionContext" => &HEART_RATE_MOTION_CONTEXT,
        "HKMetadataKeyHeartRateRecoveryTestType" => &HEART_RATE_RECOVERY_TEST_TYPE,
        "HKMetadataKeyHeartRateSensorLocation" => &HEART_RATE_SENSOR_LOCATION,
        "HKMetadataKeyInsulinDeliveryReason" => &INSULIN_DELIVERY_REASON,
        "HKMetadataKeyPhysicalEffortEstimationType" => &PHYSICAL_EFFORT_ESTIMATION_TYPE,
        "HKMetadataKeySwimmingStrokeStyle" => &SWIMMING_STROKE_STYLE,
        "HKMetadataKeySwimmingLocationType" => &SWIMMING_LOCATION_TYPE,
        "HKMetadataKeyUserMotionContext" => &USER_MOTION_CONTEXT,
        "HKMetadataKeyVO2MaxTestType" => &VO2_MAX_TEST_TYPE,
        "HKMetadataKeyWaterSalinity" => &WATER_SALINITY,
        "HKMetadataKeyWeatherCondition" => &WEATHER_CONDITION,
        _ => return None,
    };
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_and_unknown() {
        assert_eq!(SLEEP_ANALYSIS.describe(5).unwrap(), "asleep REM");
        let err = SLEEP_ANALYSIS.describe(6).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue(_)));
    }

    #[test]
    fn test_describe_or_unknown_sentinel() {
        assert_eq!(STATE_OF_MIND_LABEL.describe_or_unknown(17), "happy");
        assert_eq!(STATE_OF_MIND_LABEL.describe_or_unknown(999), UNKNOWN_CASE);
        assert_eq!(WORKOUT_ACTIVITY_TYPE.describe_or_unknown(80), "coolDown");
        assert_eq!(WORKOUT_ACTIVITY_TYPE.describe_or_unknown(81), UNKNOWN_CASE);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text("asleepREM"), "asleep REM");
        assert_eq!(display_text("luteinizingHormoneSurge"), "luteinizing hormone surge");
        assert_eq!(display_text("awake"), "awake");
        assert_eq!(display_text("version1"), "version1");
    }

    #[test]
    fn test_coding() {
        let coding = BLOOD_GLUCOSE_MEAL_TIME.coding(2).unwrap();
        assert_eq!(
            coding.system.as_deref(),
            Some("https://developer.apple.com/documentation/healthkit/hkbloodglucosemealtime")
        );
        assert_eq!(coding.code.as_deref(), Some("2"));
        assert_eq!(coding.display.as_deref(), Some("postprandial"));
        assert!(BLOOD_GLUCOSE_MEAL_TIME.coding(3).is_none());
    }

    #[test]
    fn test_raw_values_unique() {
        for table in [
            &SLEEP_ANALYSIS,
            &SEVERITY,
            &WORKOUT_ACTIVITY_TYPE,
            &STATE_OF_MIND_LABEL,
            &WEATHER_CONDITION,
            &ECG_CLASSIFICATION,
        ] {
            let mut raws: Vec<i64> = table.cases.iter().map(|c| c.raw).collect();
            raws.sort_unstable();
            raws.dedup();
            assert_eq!(raws.len(), table.cases.len(), "{}", table.type_name);
        }
    }

    #[test]
    fn test_metadata_enum_lookup() {
        assert!(metadata_enum("HKMetadataKeyWeatherCondition").is_some());
        assert!(metadata_enum("HKMetadataKeyWeatherTemperature").is_none());
    }
}
