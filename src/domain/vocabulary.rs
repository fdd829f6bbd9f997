//! Closed vocabularies of HealthKit type identifiers
//!
//! Every mapping table key and every sample type identifier is resolved against
//! one of these enums. Adding an identifier here forces the category descriptor
//! table to handle it, since that table matches exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed identifier vocabulary with string round-tripping.
macro_rules! type_identifiers {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($family:expr) {
            $($variant:ident => $ident:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(
                #[doc = $ident]
                $variant,
            )+
        }

        impl $name {
            /// Every identifier in this vocabulary, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Record family this vocabulary belongs to
            pub const FAMILY: SampleFamily = $family;

            /// The HealthKit identifier string
            pub fn identifier(self) -> &'static str {
                match self {
                    $($name::$variant => $ident,)+
                }
            }

            /// Resolves a HealthKit identifier string
            pub fn from_identifier(identifier: &str) -> Option<Self> {
                match identifier {
                    $($ident => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.identifier())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_identifier(s).ok_or_else(|| {
                    format!("'{}' is not a known {} identifier", s, Self::FAMILY)
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.identifier())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Record families, one per mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SampleFamily {
    /// Scalar quantity samples
    #[serde(rename = "HKQuantitySample")]
    Quantity,
    /// Enumerated category samples
    #[serde(rename = "HKCategorySample")]
    Category,
    /// Correlations of quantity samples
    #[serde(rename = "HKCorrelation")]
    Correlation,
    /// Electrocardiogram waveforms
    #[serde(rename = "HKElectrocardiogram")]
    Electrocardiogram,
    /// Workouts
    #[serde(rename = "HKWorkout")]
    Workout,
    /// State of mind (mood) samples
    #[serde(rename = "HKStateOfMind")]
    StateOfMind,
}

impl SampleFamily {
    /// Every family, in mapping document order
    pub const ALL: [SampleFamily; 6] = [
        SampleFamily::Quantity,
        SampleFamily::Category,
        SampleFamily::Correlation,
        SampleFamily::Electrocardiogram,
        SampleFamily::Workout,
        SampleFamily::StateOfMind,
    ];

    /// Top-level key of this family in a mapping document
    pub fn document_key(self) -> &'static str {
        match self {
            SampleFamily::Quantity => "HKQuantitySample",
            SampleFamily::Category => "HKCategorySample",
            SampleFamily::Correlation => "HKCorrelation",
            SampleFamily::Electrocardiogram => "HKElectrocardiogram",
            SampleFamily::Workout => "HKWorkout",
            SampleFamily::StateOfMind => "HKStateOfMind",
        }
    }

    /// Identifier strings belonging to this family
    pub fn identifiers(self) -> Vec<&'static str> {
        match self {
            SampleFamily::Quantity => QuantityType::ALL.iter().map(|t| t.identifier()).collect(),
            SampleFamily::Category => CategoryType::ALL.iter().map(|t| t.identifier()).collect(),
            SampleFamily::Correlation => {
                CorrelationType::ALL.iter().map(|t| t.identifier()).collect()
            }
            SampleFamily::Electrocardiogram => {
                ElectrocardiogramType::ALL.iter().map(|t| t.identifier()).collect()
            }
            SampleFamily::Workout => WorkoutType::ALL.iter().map(|t| t.identifier()).collect(),
            SampleFamily::StateOfMind => {
                StateOfMindType::ALL.iter().map(|t| t.identifier()).collect()
            }
        }
    }
}

impl fmt::Display for SampleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_key())
    }
}

impl FromStr for SampleFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantity" | "hkquantitysample" => Ok(SampleFamily::Quantity),
            "category" | "hkcategorysample" => Ok(SampleFamily::Category),
            "correlation" | "hkcorrelation" => Ok(SampleFamily::Correlation),
            "electrocardiogram" | "ecg" | "hkelectrocardiogram" => {
                Ok(SampleFamily::Electrocardiogram)
            }
            "workout" | "hkworkout" => Ok(SampleFamily::Workout),
            "stateofmind" | "state-of-mind" | "mood" | "hkstateofmind" => {
                Ok(SampleFamily::StateOfMind)
            }
            _ => Err(format!(
                "Invalid sample family: {s}. Expected one of: quantity, category, correlation, electrocardiogram, workout, state-of-mind"
            )),
        }
    }
}

type_identifiers! {
    /// Quantity type identifiers
    pub enum QuantityType (SampleFamily::Quantity) {
        ActiveEnergyBurned => "HKQuantityTypeIdentifierActiveEnergyBurned",
        AppleExerciseTime => "HKQuantityTypeIdentifierAppleExerciseTime",
        AppleMoveTime => "HKQuantityTypeIdentifierAppleMoveTime",
        AppleSleepingWristTemperature => "HKQuantityTypeIdentifierAppleSleepingWristTemperature",
        AppleStandTime => "HKQuantityTypeIdentifierAppleStandTime",
        AppleWalkingSteadiness => "HKQuantityTypeIdentifierAppleWalkingSteadiness",
        AtrialFibrillationBurden => "HKQuantityTypeIdentifierAtrialFibrillationBurden",
        BasalBodyTemperature => "HKQuantityTypeIdentifierBasalBodyTemperature",
        BasalEnergyBurned => "HKQuantityTypeIdentifierBasalEnergyBurned",
        BloodAlcoholContent => "HKQuantityTypeIdentifierBloodAlcoholContent",
        BloodGlucose => "HKQuantityTypeIdentifierBloodGlucose",
        BloodPressureDiastolic => "HKQuantityTypeIdentifierBloodPressureDiastolic",
        BloodPressureSystolic => "HKQuantityTypeIdentifierBloodPressureSystolic",
        BodyFatPercentage => "HKQuantityTypeIdentifierBodyFatPercentage",
        BodyMass => "HKQuantityTypeIdentifierBodyMass",
        BodyMassIndex => "HKQuantityTypeIdentifierBodyMassIndex",
        BodyTemperature => "HKQuantityTypeIdentifierBodyTemperature",
        CrossCountrySkiingSpeed => "HKQuantityTypeIdentifierCrossCountrySkiingSpeed",
        CyclingCadence => "HKQuantityTypeIdentifierCyclingCadence",
        CyclingFunctionalThresholdPower => "HKQuantityTypeIdentifierCyclingFunctionalThresholdPower",
        CyclingPower => "HKQuantityTypeIdentifierCyclingPower",
        CyclingSpeed => "HKQuantityTypeIdentifierCyclingSpeed",
        DietaryBiotin => "HKQuantityTypeIdentifierDietaryBiotin",
        DietaryCaffeine => "HKQuantityTypeIdentifierDietaryCaffeine",
        DietaryCalcium => "HKQuantityTypeIdentifierDietaryCalcium",
        DietaryCarbohydrates => "HKQuantityTypeIdentifierDietaryCarbohydrates",
        DietaryChloride => "HKQuantityTypeIdentifierDietaryChloride",
        DietaryCholesterol => "HKQuantityTypeIdentifierDietaryCholesterol",
        DietaryChromium => "HKQuantityTypeIdentifierDietaryChromium",
        DietaryCopper => "HKQuantityTypeIdentifierDietaryCopper",
        DietaryEnergyConsumed => "HKQuantityTypeIdentifierDietaryEnergyConsumed",
        DietaryFatMonounsaturated => "HKQuantityTypeIdentifierDietaryFatMonounsaturated",
        DietaryFatPolyunsaturated => "HKQuantityTypeIdentifierDietaryFatPolyunsaturated",
        DietaryFatSaturated => "HKQuantityTypeIdentifierDietaryFatSaturated",
        DietaryFatTotal => "HKQuantityTypeIdentifierDietaryFatTotal",
        DietaryFiber => "HKQuantityTypeIdentifierDietaryFiber",
        DietaryFolate => "HKQuantityTypeIdentifierDietaryFolate",
        DietaryIodine => "HKQuantityTypeIdentifierDietaryIodine",
        DietaryIron => "HKQuantityTypeIdentifierDietaryIron",
        DietaryMagnesium => "HKQuantityTypeIdentifierDietaryMagnesium",
        DietaryManganese => "HKQuantityTypeIdentifierDietaryManganese",
        DietaryMolybdenum => "HKQuantityTypeIdentifierDietaryMolybdenum",
        DietaryNiacin => "HKQuantityTypeIdentifierDietaryNiacin",
        DietaryPantothenicAcid => "HKQuantityTypeIdentifierDietaryPantothenicAcid",
        DietaryPhosphorus => "HKQuantityTypeIdentifierDietaryPhosphorus",
        DietaryPotassium => "HKQuantityTypeIdentifierDietaryPotassium",
        DietaryProtein => "HKQuantityTypeIdentifierDietaryProtein",
        DietaryRiboflavin => "HKQuantityTypeIdentifierDietaryRiboflavin",
        DietarySelenium => "HKQuantityTypeIdentifierDietarySelenium",
        DietarySodium => "HKQuantityTypeIdentifierDietarySodium",
        DietarySugar => "HKQuantityTypeIdentifierDietarySugar",
        DietaryThiamin => "HKQuantityTypeIdentifierDietaryThiamin",
        DietaryVitaminA => "HKQuantityTypeIdentifierDietaryVitaminA",
        DietaryVitaminB12 => "HKQuantityTypeIdentifierDietaryVitaminB12",
        DietaryVitaminB6 => "HKQuantityTypeIdentifierDietaryVitaminB6",
        DietaryVitaminC => "HKQuantityTypeIdentifierDietaryVitaminC",
        DietaryVitaminD => "HKQuantityTypeIdentifierDietaryVitaminD",
        DietaryVitaminE => "HKQuantityTypeIdentifierDietaryVitaminE",
        DietaryVitaminK => "HKQuantityTypeIdentifierDietaryVitaminK",
        DietaryWater => "HKQuantityTypeIdentifierDietaryWater",
        DietaryZinc => "HKQuantityTypeIdentifierDietaryZinc",
        DistanceCrossCountrySkiing => "HKQuantityTypeIdentifierDistanceCrossCountrySkiing",
        DistanceCycling => "HKQuantityTypeIdentifierDistanceCycling",
        DistanceDownhillSnowSports => "HKQuantityTypeIdentifierDistanceDownhillSnowSports",
        DistancePaddleSports => "HKQuantityTypeIdentifierDistancePaddleSports",
        DistanceRowing => "HKQuantityTypeIdentifierDistanceRowing",
        DistanceSkatingSports => "HKQuantityTypeIdentifierDistanceSkatingSports",
        DistanceSwimming => "HKQuantityTypeIdentifierDistanceSwimming",
        DistanceWalkingRunning => "HKQuantityTypeIdentifierDistanceWalkingRunning",
        DistanceWheelchair => "HKQuantityTypeIdentifierDistanceWheelchair",
        ElectrodermalActivity => "HKQuantityTypeIdentifierElectrodermalActivity",
        EnvironmentalAudioExposure => "HKQuantityTypeIdentifierEnvironmentalAudioExposure",
        EnvironmentalSoundReduction => "HKQuantityTypeIdentifierEnvironmentalSoundReduction",
        EstimatedWorkoutEffortScore => "HKQuantityTypeIdentifierEstimatedWorkoutEffortScore",
        FlightsClimbed => "HKQuantityTypeIdentifierFlightsClimbed",
        ForcedExpiratoryVolume1 => "HKQuantityTypeIdentifierForcedExpiratoryVolume1",
        ForcedVitalCapacity => "HKQuantityTypeIdentifierForcedVitalCapacity",
        HeadphoneAudioExposure => "HKQuantityTypeIdentifierHeadphoneAudioExposure",
        HeartRate => "HKQuantityTypeIdentifierHeartRate",
        HeartRateRecoveryOneMinute => "HKQuantityTypeIdentifierHeartRateRecoveryOneMinute",
        HeartRateVariabilitySDNN => "HKQuantityTypeIdentifierHeartRateVariabilitySDNN",
        Height => "HKQuantityTypeIdentifierHeight",
        InhalerUsage => "HKQuantityTypeIdentifierInhalerUsage",
        InsulinDelivery => "HKQuantityTypeIdentifierInsulinDelivery",
        LeanBodyMass => "HKQuantityTypeIdentifierLeanBodyMass",
        NikeFuel => "HKQuantityTypeIdentifierNikeFuel",
        NumberOfAlcoholicBeverages => "HKQuantityTypeIdentifierNumberOfAlcoholicBeverages",
        NumberOfTimesFallen => "HKQuantityTypeIdentifierNumberOfTimesFallen",
        OxygenSaturation => "HKQuantityTypeIdentifierOxygenSaturation",
        PaddleSportsSpeed => "HKQuantityTypeIdentifierPaddleSportsSpeed",
        PeakExpiratoryFlowRate => "HKQuantityTypeIdentifierPeakExpiratoryFlowRate",
        PeripheralPerfusionIndex => "HKQuantityTypeIdentifierPeripheralPerfusionIndex",
        PhysicalEffort => "HKQuantityTypeIdentifierPhysicalEffort",
        PushCount => "HKQuantityTypeIdentifierPushCount",
        RespiratoryRate => "HKQuantityTypeIdentifierRespiratoryRate",
        RestingHeartRate => "HKQuantityTypeIdentifierRestingHeartRate",
        RowingSpeed => "HKQuantityTypeIdentifierRowingSpeed",
        RunningGroundContactTime => "HKQuantityTypeIdentifierRunningGroundContactTime",
        RunningPower => "HKQuantityTypeIdentifierRunningPower",
        RunningSpeed => "HKQuantityTypeIdentifierRunningSpeed",
        RunningStrideLength => "HKQuantityTypeIdentifierRunningStrideLength",
        RunningVerticalOscillation => "HKQuantityTypeIdentifierRunningVerticalOscillation",
        SixMinuteWalkTestDistance => "HKQuantityTypeIdentifierSixMinuteWalkTestDistance",
        StairAscentSpeed => "HKQuantityTypeIdentifierStairAscentSpeed",
        StairDescentSpeed => "HKQuantityTypeIdentifierStairDescentSpeed",
        StepCount => "HKQuantityTypeIdentifierStepCount",
        SwimmingStrokeCount => "HKQuantityTypeIdentifierSwimmingStrokeCount",
        TimeInDaylight => "HKQuantityTypeIdentifierTimeInDaylight",
        UnderwaterDepth => "HKQuantityTypeIdentifierUnderwaterDepth",
        UvExposure => "HKQuantityTypeIdentifierUVExposure",
        Vo2Max => "HKQuantityTypeIdentifierVO2Max",
        WaistCircumference => "HKQuantityTypeIdentifierWaistCircumference",
        WalkingAsymmetryPercentage => "HKQuantityTypeIdentifierWalkingAsymmetryPercentage",
        WalkingDoubleSupportPercentage => "HKQuantityTypeIdentifierWalkingDoubleSupportPercentage",
        WalkingHeartRateAverage => "HKQuantityTypeIdentifierWalkingHeartRateAverage",
        WalkingSpeed => "HKQuantityTypeIdentifierWalkingSpeed",
        WalkingStepLength => "HKQuantityTypeIdentifierWalkingStepLength",
        WaterTemperature => "HKQuantityTypeIdentifierWaterTemperature",
        WorkoutEffortScore => "HKQuantityTypeIdentifierWorkoutEffortScore",
    }
}

type_identifiers! {
    /// Category type identifiers
    pub enum CategoryType (SampleFamily::Category) {
        AbdominalCramps => "HKCategoryTypeIdentifierAbdominalCramps",
        Acne => "HKCategoryTypeIdentifierAcne",
        AppetiteChanges => "HKCategoryTypeIdentifierAppetiteChanges",
        AppleStandHour => "HKCategoryTypeIdentifierAppleStandHour",
        AppleWalkingSteadinessEvent => "HKCategoryTypeIdentifierAppleWalkingSteadinessEvent",
        BladderIncontinence => "HKCategoryTypeIdentifierBladderIncontinence",
        BleedingAfterPregnancy => "HKCategoryTypeIdentifierBleedingAfterPregnancy",
        BleedingDuringPregnancy => "HKCategoryTypeIdentifierBleedingDuringPregnancy",
        Bloating => "HKCategoryTypeIdentifierBloating",
        BreastPain => "HKCategoryTypeIdentifierBreastPain",
        CervicalMucusQuality => "HKCategoryTypeIdentifierCervicalMucusQuality",
        ChestTightnessOrPain => "HKCategoryTypeIdentifierChestTightnessOrPain",
        Chills => "HKCategoryTypeIdentifierChills",
        Constipation => "HKCategoryTypeIdentifierConstipation",
        Contraceptive => "HKCategoryTypeIdentifierContraceptive",
        Coughing => "HKCategoryTypeIdentifierCoughing",
        Diarrhea => "HKCategoryTypeIdentifierDiarrhea",
        Dizziness => "HKCategoryTypeIdentifierDizziness",
        DrySkin => "HKCategoryTypeIdentifierDrySkin",
        EnvironmentalAudioExposureEvent => "HKCategoryTypeIdentifierEnvironmentalAudioExposureEvent",
        Fainting => "HKCategoryTypeIdentifierFainting",
        Fatigue => "HKCategoryTypeIdentifierFatigue",
        Fever => "HKCategoryTypeIdentifierFever",
        GeneralizedBodyAche => "HKCategoryTypeIdentifierGeneralizedBodyAche",
        HairLoss => "HKCategoryTypeIdentifierHairLoss",
        HandwashingEvent => "HKCategoryTypeIdentifierHandwashingEvent",
        Headache => "HKCategoryTypeIdentifierHeadache",
        HeadphoneAudioExposureEvent => "HKCategoryTypeIdentifierHeadphoneAudioExposureEvent",
        Heartburn => "HKCategoryTypeIdentifierHeartburn",
        HighHeartRateEvent => "HKCategoryTypeIdentifierHighHeartRateEvent",
        HotFlashes => "HKCategoryTypeIdentifierHotFlashes",
        InfrequentMenstrualCycles => "HKCategoryTypeIdentifierInfrequentMenstrualCycles",
        IntermenstrualBleeding => "HKCategoryTypeIdentifierIntermenstrualBleeding",
        IrregularHeartRhythmEvent => "HKCategoryTypeIdentifierIrregularHeartRhythmEvent",
        IrregularMenstrualCycles => "HKCategoryTypeIdentifierIrregularMenstrualCycles",
        Lactation => "HKCategoryTypeIdentifierLactation",
        LossOfSmell => "HKCategoryTypeIdentifierLossOfSmell",
        LossOfTaste => "HKCategoryTypeIdentifierLossOfTaste",
        LowCardioFitnessEvent => "HKCategoryTypeIdentifierLowCardioFitnessEvent",
        LowHeartRateEvent => "HKCategoryTypeIdentifierLowHeartRateEvent",
        LowerBackPain => "HKCategoryTypeIdentifierLowerBackPain",
        MemoryLapse => "HKCategoryTypeIdentifierMemoryLapse",
        MenstrualFlow => "HKCategoryTypeIdentifierMenstrualFlow",
        MindfulSession => "HKCategoryTypeIdentifierMindfulSession",
        MoodChanges => "HKCategoryTypeIdentifierMoodChanges",
        Nausea => "HKCategoryTypeIdentifierNausea",
        NightSweats => "HKCategoryTypeIdentifierNightSweats",
        OvulationTestResult => "HKCategoryTypeIdentifierOvulationTestResult",
        PelvicPain => "HKCategoryTypeIdentifierPelvicPain",
        PersistentIntermenstrualBleeding => "HKCategoryTypeIdentifierPersistentIntermenstrualBleeding",
        Pregnancy => "HKCategoryTypeIdentifierPregnancy",
        PregnancyTestResult => "HKCategoryTypeIdentifierPregnancyTestResult",
        ProgesteroneTestResult => "HKCategoryTypeIdentifierProgesteroneTestResult",
        ProlongedMenstrualPeriods => "HKCategoryTypeIdentifierProlongedMenstrualPeriods",
        RapidPoundingOrFlutteringHeartbeat => "HKCategoryTypeIdentifierRapidPoundingOrFlutteringHeartbeat",
        RunnyNose => "HKCategoryTypeIdentifierRunnyNose",
        SexualActivity => "HKCategoryTypeIdentifierSexualActivity",
        ShortnessOfBreath => "HKCategoryTypeIdentifierShortnessOfBreath",
        SinusCongestion => "HKCategoryTypeIdentifierSinusCongestion",
        SkippedHeartbeat => "HKCategoryTypeIdentifierSkippedHeartbeat",
        SleepAnalysis => "HKCategoryTypeIdentifierSleepAnalysis",
        SleepApneaEvent => "HKCategoryTypeIdentifierSleepApneaEvent",
        SleepChanges => "HKCategoryTypeIdentifierSleepChanges",
        SoreThroat => "HKCategoryTypeIdentifierSoreThroat",
        ToothbrushingEvent => "HKCategoryTypeIdentifierToothbrushingEvent",
        VaginalDryness => "HKCategoryTypeIdentifierVaginalDryness",
        Vomiting => "HKCategoryTypeIdentifierVomiting",
        Wheezing => "HKCategoryTypeIdentifierWheezing",
    }
}

type_identifiers! {
    /// Correlation type identifiers
    pub enum CorrelationType (SampleFamily::Correlation) {
        BloodPressure => "HKCorrelationTypeIdentifierBloodPressure",
        Food => "HKCorrelationTypeIdentifierFood",
    }
}

type_identifiers! {
    /// Electrocardiogram type identifier
    pub enum ElectrocardiogramType (SampleFamily::Electrocardiogram) {
        Electrocardiogram => "HKDataTypeIdentifierElectrocardiogram",
    }
}

type_identifiers! {
    /// Workout type identifier
    pub enum WorkoutType (SampleFamily::Workout) {
        Workout => "HKWorkoutTypeIdentifier",
    }
}

type_identifiers! {
    /// State of mind type identifier
    pub enum StateOfMindType (SampleFamily::StateOfMind) {
        StateOfMind => "HKDataTypeIdentifierStateOfMind",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_type_round_trip() {
        for ty in QuantityType::ALL {
            assert_eq!(QuantityType::from_identifier(ty.identifier()), Some(*ty));
        }
    }

    #[test]
    fn test_category_type_round_trip() {
        for ty in CategoryType::ALL {
            assert_eq!(ty.identifier().parse::<CategoryType>().unwrap(), *ty);
        }
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        let err = "HKQuantityTypeIdentifierBogus"
            .parse::<QuantityType>()
            .unwrap_err();
        assert!(err.contains("HKQuantitySample"));
        assert!(QuantityType::from_identifier("HKCategoryTypeIdentifierAcne").is_none());
    }

    #[test]
    fn test_identifiers_are_unique_within_family() {
        for family in SampleFamily::ALL {
            let mut ids = family.identifiers();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate identifier in {family}");
        }
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!(
            "quantity".parse::<SampleFamily>().unwrap(),
            SampleFamily::Quantity
        );
        assert_eq!(
            "HKStateOfMind".parse::<SampleFamily>().unwrap(),
            SampleFamily::StateOfMind
        );
        assert!("bogus".parse::<SampleFamily>().is_err());
    }

    #[test]
    fn test_serde_uses_identifier_string() {
        let json = serde_json::to_string(&CorrelationType::BloodPressure).unwrap();
        assert_eq!(json, "\"HKCorrelationTypeIdentifierBloodPressure\"");
        let parsed: CorrelationType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, CorrelationType::BloodPressure);
    }
}
