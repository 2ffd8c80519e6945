//! Semantic pattern table.
//!
//! An ordered list of `(keywords → canonical key, helper text)` entries used
//! to recognise recurring intake-form question intents across differently
//! worded source documents. The table is evaluated top to bottom and the
//! first entry with a keyword occurring in the title wins, so entry order is
//! the tie-break between overlapping keyword sets.
//!
//! Keys ending in `_1` are repeat-instance keys (one of several family
//! members, emergency contacts, past illnesses, ...).

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One recognisable question intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticPattern {
    /// Literal substrings; any one of them occurring in a title is a match.
    pub keywords: &'static [&'static str],
    /// Ref assigned to the first matching question.
    pub canonical_key: &'static str,
    /// Helper text shown under the question when it carries none itself.
    pub helper_text: Option<&'static str>,
}

impl SemanticPattern {
    /// True if any keyword occurs as a literal substring of `title`.
    pub fn matches(&self, title: &str) -> bool {
        self.keywords.iter().any(|k| title.contains(k))
    }

    /// The canonical key with its instance suffix stripped.
    pub fn base_key(&self) -> &'static str {
        base_key(self.canonical_key)
    }
}

const fn pattern(
    keywords: &'static [&'static str],
    canonical_key: &'static str,
    helper_text: Option<&'static str>,
) -> SemanticPattern {
    SemanticPattern {
        keywords,
        canonical_key,
        helper_text,
    }
}

/// A priority-ordered pattern list.
#[derive(Debug, Clone, Copy)]
pub struct PatternTable {
    patterns: &'static [SemanticPattern],
}

impl PatternTable {
    /// Wrap an ordered slice of patterns.
    pub const fn new(patterns: &'static [SemanticPattern]) -> Self {
        Self { patterns }
    }

    /// The built-in inpatient-intake table.
    pub const fn builtin() -> Self {
        Self::new(INTAKE_PATTERNS)
    }

    /// First pattern (in declaration order) matching the trimmed title.
    pub fn find(&self, title: &str) -> Option<&'static SemanticPattern> {
        let title = title.trim();
        self.patterns.iter().find(|p| p.matches(title))
    }

    /// All patterns, in priority order.
    pub fn patterns(&self) -> &'static [SemanticPattern] {
        self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Base keys
// ---------------------------------------------------------------------------

/// Matches an optional `_` followed by trailing ASCII digits.
static INSTANCE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_?[0-9]+$").expect("instance suffix regex"));

/// Strip a trailing numeric instance suffix (`hasFamily_1` → `hasFamily`).
///
/// Only a trailing run of digits (with at most one preceding `_`) is removed;
/// digits elsewhere in the key are left alone.
pub fn base_key(key: &str) -> &str {
    match INSTANCE_SUFFIX_RE.find(key) {
        Some(m) => &key[..m.start()],
        None => key,
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// Reference inpatient-intake questionnaire patterns, in priority order.
static INTAKE_PATTERNS: &[SemanticPattern] = &[
    pattern(&["生年月日", "誕生日", "birth"], "patientBirthDate", None),
    pattern(
        &["年齢", "歳"],
        "patientAge",
        Some("数字のみ入力ください</br>\n例）20歳→20"),
    ),
    pattern(
        &["職業", "仕事"],
        "patientOccupation",
        Some("無職の方は以前の職業を教えてください"),
    ),
    pattern(&["住所", "住まい"], "patientAddress", None),
    pattern(
        &["電話", "連絡先", "携帯", "固定"],
        "patientPhoneNumber",
        Some("携帯電話、固定電話どちらでも問題ありません。"),
    ),
    pattern(
        &["家族", "ご家族"],
        "hasFamily_1",
        Some("別居の家族も含みます"),
    ),
    pattern(
        &["お名前", "氏名", "名前"],
        "familyMemberName_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["ご年齢", "年齢"],
        "familyMemberAge_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください。数字のみ入力ください。例）20歳→20"),
    ),
    pattern(
        &["続柄", "関係"],
        "familyMemberRelationship_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["職業を教えて"],
        "familyMemberOccupation_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(&["居住", "同居", "別居"], "familyMemberResidenceStatus_1", None),
    pattern(
        &["健康状態"],
        "familyMemberHealthStatus_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["緊急連絡先", "緊急連絡"],
        "emergencyContactName_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["ご関係を教えて", "関係を教えて"],
        "emergencyContactRelation_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["住所を教えて"],
        "emergencyContactAddress_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(
        &["電話番号を教えて"],
        "emergencyContactPhoneNumber_1",
        Some("複数人いる場合は、1名ずつ情報をご入力ください"),
    ),
    pattern(&["連絡が可能な時間帯", "時間帯を選択"], "emergencyContactPreferredContactTime_1", None),
    pattern(&["身の回り", "手伝う方", "相談できる方", "入院中"], "hasSupportPersonDuringHospitalization_1", None),
    pattern(&["お子さま", "子供", "子どもの身の回り"], "hasSupportPersonForChildDuringHospitalization_1", None),
    pattern(&["その方のお名前"], "supportPersonName_1", None),
    pattern(&["その方とのご関係"], "supportPersonRelationship_1", None),
    pattern(&["依頼できる内容", "当てはまるものをすべて選択"], "supportTasksAvailable_1", None),
    pattern(&["病気はいつ頃", "症状がありましたか", "入院の経緯"], "hospitalizationProgress", None),
    pattern(&["どのような症状", "症状でしたか"], "hospitalizationTriggerSymptoms", None),
    pattern(&["つらいこと", "今つらい"], "currentDistress", None),
    pattern(&["医師から", "病気について", "説明を受けていますか"], "doctorExplanationOfIllness", None),
    pattern(
        &["入院生活", "治療に対する", "ご希望"],
        "hospitalizationAndTreatmentPreferences",
        Some("特になければ「なし」とご記入ください"),
    ),
    pattern(&["かかった病気", "既往歴", "病歴"], "diseasesHistory_1", None),
    pattern(
        &["病名を教えて"],
        "typeOfDiseasesHistory_1",
        Some("複数ある場合は、一つずつ入力してください"),
    ),
    pattern(
        &["何歳の時", "年齢の時"],
        "ageOfDiseaseHistory_1",
        Some("数値のみの入力項目です。例）16歳→16"),
    ),
    pattern(&["受けた治療"], "treatmentDetailOfDiseasesHistory_1", None),
    pattern(&["かかった病院名"], "treatedHospitalOfDiseasesHistory_1", None),
    pattern(
        &["金属", "人工物", "インプラント", "ペースメーカー"],
        "hasImplantedMetals",
        Some("例）インプラント、ペースメーカーなど"),
    ),
    pattern(
        &["どのような人工物"],
        "typeOfImplantedMetals",
        Some("例）インプラント、ペースメーカーなど"),
    ),
    pattern(
        &["医療処置", "現在行っている"],
        "currentMedicalTreatments",
        Some("例）創の処置、自己注射、シーパップなど。特にない場合は「なし」とご記入ください"),
    ),
    pattern(
        &["使用している薬", "現在使用している薬"],
        "usingMedication",
        Some("飲薬、目薬、貼り薬、坐薬、塗り薬、市販薬、健康食品、サプリメントなど"),
    ),
    pattern(&["お薬手帳"], "hasMedicationNotebook", None),
    pattern(
        &["お薬手帳の画像", "画像をアップロード"],
        "medicationNotebookImage",
        Some("現在定期的に飲んでいるお薬のページを撮影してください。お薬手帳の撮影が難しい場合はお薬の写真でも構いません。"),
    ),
    pattern(
        &["使用している薬の名前", "薬の名前"],
        "currentMedicationDetail",
        Some("飲薬、目薬、貼り薬、坐薬、塗り薬、市販薬、健康食品、サプリメントなど"),
    ),
    pattern(&["アレルギー"], "hasAllergies", None),
    pattern(&["アレルギーで当てはまる"], "typeOfAllergies", None),
    pattern(
        &["薬品名を教えて", "薬品名"],
        "detailOfDrugAllergies",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「薬品」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["症状を教えて"],
        "drugAllergySymptoms",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「薬品」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["食品名を教えて"],
        "detailOfFoodAllergies",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「食品」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["食品", "アレルギー症状"],
        "foodAllergySymptoms",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「食品」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["その他の詳細", "その他（絆創膏"],
        "otherDetailOfAllergies",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「その他」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["その他", "アレルギー症状"],
        "otherAllergySymptoms",
        Some("「アレルギーで当てはまるものをすべて選択してください」の設問で「その他」をご選択された方にお伺いしています。"),
    ),
    pattern(&["飲酒", "お酒"], "drinksAlcohol", None),
    pattern(&["お酒の種類"], "preferredAlcoholType", None),
    pattern(
        &["1日に飲む量", "飲む量"],
        "alcoholQuantityPerDay",
        Some("杯数を数字のみでご入力ください"),
    ),
    pattern(
        &["何年間お酒"],
        "yearsOfAlcoholConsumption",
        Some("数字のみでご入力ください"),
    ),
    pattern(&["喫煙", "たばこ", "吸っていますか"], "hasSmokingHabit", None),
    pattern(
        &["何本吸っていますか", "1日あたり"],
        "dailyCigaretteConsumption",
        Some("過去に吸っていた方は当時の本数をご入力ください"),
    ),
    pattern(
        &["何年間吸っていますか"],
        "yearsOfSmoking",
        Some("過去に吸っていた方は何年間吸っていたのかをご入力ください"),
    ),
    pattern(&["禁煙の意思"], "willingToQuitSmoking", None),
    pattern(&["食欲"], "hasAppetite", None),
    pattern(&["食事制限"], "hasDietaryRestrictions", None),
    pattern(&["痩せた", "体重"], "perceivedRecentWeightLoss", None),
    pattern(&["入れ歯"], "usesDentures", None),
    pattern(
        &["食事形態", "特殊な場合"],
        "specialDietaryRequirements",
        Some("例）きざみ、流動食、ミルク、母乳の量と回数など"),
    ),
    pattern(&["ムセる", "食事中"], "experiencesChokingDuringMeals", None),
    pattern(&["ご自身で食べられますか"], "canEatIndependently", None),
    pattern(
        &["排尿の回数", "1日あたりの排尿"],
        "timesUrinatePerDay",
        Some("数字のみ入力ください。おおよその平均的な1日の回数を記載ください。例）1日5回→5"),
    ),
    pattern(
        &["夜間の排尿"],
        "timesNightlyUrinatePerDay",
        Some("数字のみ入力ください。おおよその平均的な夜間の回数を記載ください。例）1日1回→1"),
    ),
    pattern(&["使用しているもので当てはまる", "排尿"], "urinaryAidsUsed", None),
    pattern(
        &["その他の詳細を教えて", "排尿のその他"],
        "otherUrinaryAidsDetails",
        Some("「使用しているもので当てはまるものをすべて選択してください」の設問で「その他」をご選択された方にお伺いしています。"),
    ),
    pattern(&["排尿のことで", "お困りのこと"], "hasUrinaryConcerns", None),
    pattern(&["お困りの内容を教えて", "排尿のお困り"], "urinaryConcernsDetails", None),
    pattern(
        &["排便の回数", "1日あたりの排便"],
        "timesDefecatePerDay",
        Some("数字のみ入力ください。おおよその平均的な1日の回数を記載ください。例）1日5回→5"),
    ),
    pattern(
        &["夜間の排便"],
        "timesNightlyDefecatePerDay",
        Some("数字のみ入力ください。おおよその平均的な夜間の回数を記載ください。例）1日1回→1"),
    ),
    pattern(&["排便", "使用しているもの"], "bowelAidsUsed", None),
    pattern(
        &["その他の詳細を教えて", "排便のその他"],
        "otherBowelAidsDetails",
        Some("「使用しているもので当てはまるものをすべて選択してください」の設問で「その他」をご選択された方にお伺いしています。"),
    ),
    pattern(&["排便のことで", "お困り"], "hasBowelConcerns", None),
    pattern(&["お困りの内容を教えて", "排便のお困り"], "bowelConcernsDetails", None),
    pattern(&["身体を清潔にする", "入浴", "シャワー", "清拭"], "bodyCleaningMethods", None),
    pattern(&["おくちを清潔にする", "うがい", "歯磨き"], "oralCleaningHabits", None),
    pattern(
        &["おくちを清潔にする回数"],
        "dailyOralCleaningFrequency",
        Some("数字のみ入力ください。例）1日3回の場合→3"),
    ),
    pattern(&["着替え", "不便", "不都合"], "hasDressingDifficulties", None),
    pattern(&["不便や不都合について詳しく"], "dressingDifficultiesDetails", None),
    pattern(&["皮膚の状態", "皮膚の問題"], "hasSkinIssues", None),
    pattern(
        &["皮膚の問題を詳しく"],
        "skinIssuesDetails",
        Some("問題がある部位、状況を詳しく記載ください。"),
    ),
    pattern(&["床ずれ"], "hasHadPressureUlcers", None),
    pattern(&["骨があたるところ"], "hasPressurePointsDueToUlcers", None),
    pattern(&["むくみ"], "hasSwelling", None),
    pattern(
        &["目・耳", "不自由", "メガネ", "補聴器"],
        "hasVisionOrHearingImpairment",
        Some("メガネやコンタクト、補聴器を使用されている場合も該当の部位を選択してください"),
    ),
    pattern(&["目に対して使用している", "眼鏡", "コンタクト"], "visualAidDevices", None),
    pattern(&["補聴器を使用していますか"], "usesHearingAid", None),
    pattern(&["会話で困ること"], "hasConversationDifficulties", None),
    pattern(&["物忘れ"], "hasMemoryIssues", None),
    pattern(
        &["睡眠時間", "何時から何時"],
        "sleepSchedule",
        Some("例）22時頃〜6時頃など"),
    ),
    pattern(&["いびき"], "hasSnoring", None),
    pattern(&["移動", "不自由"], "hasMobilityIssues", None),
    pattern(&["つまずき"], "proneToTripping", None),
    pattern(&["杖", "装具", "移動時"], "requiresMobilityAid", None),
    pattern(&["屋内で使用している"], "indoorMobilityAidsUsed", None),
    pattern(&["屋外で使用している"], "outdoorMobilityAidsUsed", None),
    pattern(&["転んだこと", "半年以内"], "hasFallenInLastSixMonths", None),
    pattern(&["普段の活動", "外出"], "activityLevel", None),
    pattern(&["医師から療養", "生活のこと", "説明を受けていますか"], "hasReceivedMedicalGuidance", None),
    pattern(
        &["当てはまるものを選択", "説明されたことは守れている"],
        "adherenceToMedicalGuidance",
        Some("「医師から療養や生活のことについて説明を受けていますか？」の設問で「はい」をご選択された方にお伺いしています。"),
    ),
    pattern(&["普段の運動", "おすわり", "つかまり立ち"], "typeOfExercisesRegularly", None),
    pattern(&["好きな遊び"], "favoritePlayActivities", None),
    pattern(&["予防接種", "月齢・年齢"], "ageAppropriateVaccinationsCompleted", None),
    pattern(&["介護保険", "要支援", "要介護"], "longTermCareInsuranceApplicationStatus", None),
    pattern(&["ケアマネジャー", "訪問看護師", "事業所"], "hasCareManagerOrHomeNurse_1", None),
    pattern(
        &["事業所を教えて", "ケアマネ"],
        "careServiceProviderName_1",
        Some("事業所を複数利用している場合は一つずつ入力してください"),
    ),
    pattern(&["担当者名を教えて"], "careServiceProviderContactPersonName_1", None),
    pattern(&["利用しているサービスの内容"], "longTermCareServicesUsed", None),
    pattern(&["障害者手帳", "指定難病", "小児慢性", "利用中", "申請中"], "nonLongTermCareProgramsUsed", None),
    pattern(
        &["障害者手帳の制度", "申請状況"],
        "disabilityCertificateApplicationStatus",
        Some("「利用している制度で当てはまるものをすべて選択してください？」の設問で「障害者手帳」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["障害者手帳の等級"],
        "disabilityCertificateGrade",
        Some("数字のみを入力してください"),
    ),
    pattern(
        &["指定難病の制度"],
        "specifiedDiseaseApplicationStatus",
        Some("「利用している制度で当てはまるものをすべて選択してください？」の設問で「指定難病」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["病気の種類を教えて", "小児慢性"],
        "pediatricChronicSpecifiedDiseaseType",
        Some("「利用している制度で当てはまるものをすべて選択してください？」の設問で「小児慢性特定疾患」をご選択された方にお伺いしています。"),
    ),
    pattern(
        &["その他に利用している制度"],
        "otherSupportProgramsUsed",
        Some("「利用している制度で当てはまるものをすべて選択してください？」の設問で「その他」をご選択された方にお伺いしています。"),
    ),
    pattern(&["選択された制度", "サービスの内容"], "serviceDetailsForSelectedPrograms", None),
    pattern(&["担当者の氏名"], "contactPersonForSelectedPrograms", None),
    pattern(&["担当者の連絡先"], "contactDetailsForSelectedPrograms", None),
    pattern(
        &["エレベーター", "2階以上"],
        "hasElevatorAccess",
        Some("住居が2階以上でない場合は、「いいえ」を選択してください"),
    ),
    pattern(&["退院後", "療養先", "過ごし方"], "postDischargeCarePreferences", None),
    pattern(&["社会福祉", "詳しい話"], "wantsSocialWelfareInformation", None),
    pattern(
        &["お子さまの性格"],
        "selfDescribedPersonality",
        Some("例）明るい、我慢強い、神経質、短期、その他"),
    ),
    pattern(&["信仰", "宗教", "治療上の制限"], "hasReligiousTreatmentRestrictions", None),
    pattern(
        &["宗教上の制限"],
        "religiousTreatmentRestrictionDetails",
        Some("例）食事、輸血など"),
    ),
    pattern(
        &["大切にしてきた", "ものごと"],
        "cherishedValuesAndActivities",
        Some("例）趣味、旅行、家族との時間、思い出のある自宅での生活など"),
    ),
    pattern(&["もしもの時", "望む医療", "話し合っている"], "hasDiscussedMedicalPreferences", None),
    pattern(&["心配なこと", "相談したいこと", "入院に際して"], "hospitalizationConcernsAndRequests", None),
];
