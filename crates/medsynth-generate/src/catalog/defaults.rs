//! Built-in reference data (Egyptian context, English transliteration).

use std::collections::{BTreeMap, BTreeSet};

use super::{AlertTargeting, AlertTemplate, DeviceSpec, SeverityWeights};

pub const MALE_FIRST_NAMES: &[&str] = &[
    "Mohamed", "Ahmed", "Mahmoud", "Mostafa", "Hassan", "Hussein", "Ibrahim", "Ali", "Khaled",
    "Omar", "Youssef", "Yasser", "Tarek", "Amr", "Sherif", "Karim", "Wael", "Ramy", "Sameh",
    "Fares", "Islam", "Ehab", "Ayman", "Ashraf", "Samy", "Saeed", "Saleh", "Salem", "Gamal",
    "Fathy", "Medhat", "Haitham", "Tamer", "Mina", "George", "Shenouda", "Ziad", "Malek", "Adam",
    "Selim", "Yassin", "Adel", "Mazen", "Bilal", "Zaid", "Seif", "Hamza", "Anas", "Raed",
    "Mohanad", "Marwan", "Nour El-Din", "Abdelrahman", "Abdullah", "Abdelaziz", "Eyad",
    "Abdelrahim", "Adham", "Aws", "Laith",
];

pub const FEMALE_FIRST_NAMES: &[&str] = &[
    "Fatma", "Fatma El-Zahraa", "Maryam", "Sarah", "Aya", "Doaa", "Radwa", "Noha", "Heba", "Reem",
    "Mona", "Hala", "Hana", "Dina", "Soha", "Iman", "Safaa", "Rehab", "Rasha", "Lobna", "Yasmine",
    "Shaimaa", "Abeer", "Naglaa", "Nora", "Nariman", "Hoda", "Samar", "Ghada", "Hanan", "Nour",
    "Jana", "Malak", "Laila", "Salma", "Yara", "Habiba", "Farida", "Hagar", "Rahma", "Judy",
    "Rawan", "Zeinab", "Donia", "Rana", "Gehad", "Janna", "Sidra", "Talia", "Jouri", "Aline",
    "Layan", "Talin", "Rodina", "Raghad", "Alaa", "Basmala", "Shahd", "Sondos", "Saga",
];

pub const LAST_NAMES: &[&str] = &[
    "El-Masry", "El-Qahery", "El-Saeedi", "El-Aswany", "El-Iskandarany", "El-Alawy", "El-Hashemy",
    "El-Ansari", "El-Sherif", "El-Qurashi", "El-Araby", "Osman", "Abdelaziz", "Abdelhamid",
    "Abdelfattah", "Abdullah", "Abdelsalam", "Kamel", "Hussein", "Mahmoud", "Ali", "Saad", "Amin",
    "Farag", "Saber", "Mohsen", "El-Khouly", "Gad", "Wahba", "Bakr", "Nassar", "Afifi",
    "El-Shennawy", "Abo El-Naga", "Ramadan", "Shawky", "Hassanin", "Morsi", "Mansour", "Fahmy",
    "Helmy", "Shehata", "Sarhan", "Salem", "Salama", "Sobhy", "Mokhtar", "El-Sherbiny", "Zayed",
    "Ghoneim", "Hegazy", "El-Omda", "Ghamrawy", "El-Ghazaly", "El-Sakka", "Zaker", "Metwally",
    "Shalaby",
];

pub const PHONE_PREFIXES: &[&str] = &["010", "011", "012", "015"];

pub const SPECIALIZATIONS: &[&str] = &[
    "Internal Medicine",
    "Cardiology",
    "Pediatrics",
    "Obstetrics and Gynecology",
    "Orthopedics",
    "ENT (Otolaryngology)",
    "Dermatology",
    "Dentistry",
    "Oncology",
    "General Surgery",
    "Neurology",
    "Urology",
    "Psychiatry",
    "Ophthalmology",
    "Clinical Nutrition",
    "Endocrinology",
    "Pulmonology",
    "Obesity Management",
    "Immunology",
    "Family Medicine",
    "Emergency Medicine",
];

pub const GOVERNORATES: &[&str] = &[
    "Cairo", "Giza", "Alexandria", "Port Said", "Suez", "Damietta", "Dakahlia", "Sharqia",
    "Qalyubia", "Kafr El Sheikh", "Gharbia", "Monufia", "Beheira", "Ismailia", "Beni Suef",
    "Faiyum", "Minya", "Asyut", "Sohag", "Qena", "Luxor", "Aswan", "Red Sea", "New Valley",
    "Matrouh", "North Sinai", "South Sinai",
];

const CITIES_BY_GOVERNORATE: &[(&str, &[&str])] = &[
    (
        "Cairo",
        &[
            "Nasr City", "Heliopolis", "Maadi", "Shubra", "Zamalek", "Al Rehab",
            "Fifth Settlement", "Helwan", "Ain Shams", "El Marg", "Madinaty", "Mokattam",
            "Abbassia", "Ataba", "Sayeda Zeinab", "New Cairo", "New October",
        ],
    ),
    (
        "Giza",
        &[
            "Dokki", "Mohandessin", "Imbaba", "Agouza", "6th of October", "Sheikh Zayed", "Haram",
            "Faisal", "Boulaq El Dakrour", "Mounib", "Ayat", "Manshat El Qanater",
        ],
    ),
    (
        "Alexandria",
        &[
            "Smouha", "Montaza", "Agami", "Moharam Bek", "Miami", "Bakos", "Sidi Bishr",
            "Sidi Gaber", "Borg El Arab", "Asafra",
        ],
    ),
    (
        "Sharqia",
        &[
            "Zagazig", "Belbeis", "10th of Ramadan", "Minya El Qamh", "Hehia", "Abu Hammad",
            "Abu Kabir", "Faqous", "Al Qarin", "New Salhia",
        ],
    ),
    (
        "Gharbia",
        &["Tanta", "El Mahalla El Kubra", "Kafr El Zayat", "Zifta", "Samannoud"],
    ),
    (
        "Monufia",
        &["Shebin El Kom", "Menouf", "Sadat City", "Quweisna", "Ashmoun"],
    ),
    (
        "Qalyubia",
        &["Benha", "Shubra El Kheima", "Qalyub", "Toukh", "Khanka"],
    ),
    (
        "Dakahlia",
        &["Mansoura", "Mit Ghamr", "Belqas", "Senbellawein", "Talkha", "Gamasa"],
    ),
    (
        "Beheira",
        &["Damanhour", "Kafr El Dawar", "Rashid", "Kom Hamada", "Itay El Barud"],
    ),
    (
        "Port Said",
        &["Port Fuad", "Al Sharq District", "Al Arab District", "Al Zohour District"],
    ),
    (
        "Suez",
        &["Suez District", "Arbaeen District", "Faisal District", "Attaka"],
    ),
    (
        "Ismailia",
        &["Ismailia City", "Fayed", "Qantara Sharq", "Qantara Gharb"],
    ),
    (
        "Red Sea",
        &["Hurghada", "El Gouna", "Ras Gharib", "Safaga", "Quseir", "Marsa Alam"],
    ),
    (
        "South Sinai",
        &["Sharm El Sheikh", "Dahab", "Nuweiba", "Taba", "Saint Catherine"],
    ),
];

const EXTRA_FALLBACK_CITIES: &[&str] = &[
    "Marsa Matrouh", "Alamein", "Arish", "Luxor City", "Aswan City", "Sohag City",
];

pub const STREET_NAMES: &[&str] = &[
    "El Nile", "El Haram", "El Gomhouria", "El Mahatta", "El Geish", "El Horreya", "El Salam",
    "Misr", "El Tahrir", "El Shohada", "El Orouba", "Airport", "El Zohour", "El Mostaqbal",
    "El Nasr", "El Wahda", "El Galaa", "Ramses", "26th of July", "Salah Salem",
];

pub const STREET_TYPES: &[&str] = &["St.", "Rd.", "Sq.", "Lane", "Ave."];

pub const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub const ALLERGIES: &[&str] = &[
    "Penicillin allergy",
    "Aspirin allergy",
    "Seafood allergy",
    "Peanut allergy",
    "Dust allergy",
    "Pollen allergy",
    "Latex allergy",
    "Antibiotic allergy",
];

pub const CHRONIC_DISEASES: &[&str] = &[
    "Diabetes mellitus",
    "Hypertension",
    "Heart disease",
    "Chronic kidney disease",
    "Asthma",
    "Thyroid disorders",
    "Arthritis",
    "Viral hepatitis",
    "Epilepsy",
];

/// "None" plus three blank entries.
pub const ALLERGY_NULL_SLOTS: u32 = 4;
/// "None" plus four blank entries.
pub const CHRONIC_DISEASE_NULL_SLOTS: u32 = 5;

pub const VISIT_REASONS: &[&str] = &[
    "Routine check-up",
    "Fever and chills",
    "Severe headache",
    "Stomach pain",
    "Back pain",
    "Skin rash",
    "Follow-up appointment",
    "Consultation for surgery",
    "Annual physical exam",
    "Vaccination",
    "Chronic disease management",
    "Injury assessment",
    "Allergy symptoms",
    "Chest pain",
    "High blood pressure check",
];

pub const DIAGNOSES: &[&str] = &[
    "Common Cold",
    "Influenza",
    "Migraine",
    "Gastritis",
    "Muscle Strain",
    "Eczema",
    "Hypertension",
    "Type 2 Diabetes",
    "Bronchitis",
    "Urinary Tract Infection",
    "Healthy",
    "Seasonal Allergies",
    "Anxiety Disorder",
    "Sprain",
    "Gastroenteritis",
];

pub const PRESCRIPTIONS: &[&str] = &[
    "Paracetamol 500mg",
    "Ibuprofen 400mg",
    "Amoxicillin 500mg",
    "Lisinopril 10mg",
    "Metformin 500mg",
    "Antihistamine",
    "Cough syrup",
    "Topical cream",
    "Vitamin C & Zinc",
    "Rest and hydration",
    "Physical therapy",
    "No medication required",
];

pub const DOCTOR_NOTES: &[&str] = &[
    "Patient advised to rest.",
    "Follow up in 2 weeks.",
    "Patient refused medication.",
    "Symptoms persistent for 3 days.",
    "Referred to specialist.",
    "Vital signs stable.",
    "Blood tests ordered.",
    "Discussed lifestyle changes.",
    "Patient reporting improvement.",
    "Prescription updated.",
];

pub const IN_PROGRESS_NOTE: &str = "Patient currently in examination room.";

pub const MEDICATION_NAMES: &[&str] = &[
    "Paracetamol (Panadol)",
    "Ibuprofen (Brufen)",
    "Amoxicillin (Augmentin)",
    "Metformin (Glucophage)",
    "Atorvastatin (Lipitor)",
    "Omeprazole (Losec)",
    "Amlodipine (Norvasc)",
    "Lisinopril (Zestril)",
    "Azithromycin (Zithromax)",
    "Ciprofloxacin (Ciprobay)",
    "Pantoprazole (Controloc)",
    "Bisoprolol (Concor)",
    "Clopidogrel (Plavix)",
    "Acetylsalicylic acid (Aspirin)",
    "Levothyroxine (Eltroxin)",
    "Prednisolone (Solupred)",
    "Cetirizine (Zyrtec)",
    "Loratadine (Claritin)",
    "Vitamin D3",
    "Multivitamins",
];

pub const DOSAGES: &[&str] = &[
    "500mg", "1000mg", "20mg", "40mg", "5mg", "10mg", "875mg", "1 tablet", "1 capsule", "5ml",
    "10ml", "1 puff", "2 drops",
];

pub const FREQUENCIES: &[&str] = &[
    "Once daily",
    "Twice daily",
    "Three times a day",
    "Every 8 hours",
    "Every 12 hours",
    "Before sleep",
    "As needed (PRN)",
    "Every 4 to 6 hours",
    "Once a week",
];

pub const DURATIONS: &[&str] = &[
    "3 days",
    "5 days",
    "7 days",
    "10 days",
    "2 weeks",
    "1 month",
    "3 months",
    "Chronic/Ongoing",
];

pub const INSTRUCTIONS: &[&str] = &[
    "Take after meals.",
    "Take on an empty stomach.",
    "Take with a full glass of water.",
    "Do not crush or chew.",
    "Shake well before use.",
    "Store in a cool, dry place.",
    "Avoid driving after taking this medication.",
    "Take in the morning.",
    "Take before bedtime.",
    "Finish the full course.",
];

pub const NORMAL_READING_NOTES: &[&str] = &[
    "Reading within normal range.",
    "Patient feeling well.",
    "Routine automated log.",
    "Daily check.",
];

pub const NORMAL_READING_NULL_SLOTS: u32 = 3;

pub const CRITICAL_READING_NOTES: &[&str] = &[
    "Reading critically high!",
    "Reading critically low - alert triggered.",
    "Patient advised to seek emergency care.",
    "Abnormal reading detected.",
    "Follow-up required immediately.",
];

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn cities_by_governorate() -> BTreeMap<String, Vec<String>> {
    CITIES_BY_GOVERNORATE
        .iter()
        .map(|(governorate, cities)| (governorate.to_string(), strings(cities)))
        .collect()
}

/// Every mapped city plus a few that belong to unmapped governorates, sorted.
pub fn fallback_cities() -> Vec<String> {
    let mut cities: BTreeSet<&str> = CITIES_BY_GOVERNORATE
        .iter()
        .flat_map(|(_, cities)| cities.iter().copied())
        .collect();
    cities.extend(EXTRA_FALLBACK_CITIES.iter().copied());
    cities.into_iter().map(str::to_string).collect()
}

pub fn devices() -> Vec<DeviceSpec> {
    vec![
        device("Blood_Pressure", "mmHg", (90.0, 120.0), 80.0, 180.0, None),
        device("Blood_Sugar", "mg/dL", (70.0, 140.0), 50.0, 200.0, None),
        device("Heart_Rate", "bpm", (60.0, 100.0), 40.0, 120.0, None),
        device("Temperature", "°C", (36.1, 37.2), 35.0, 39.0, None),
        device("Oxygen_Level", "%", (95.0, 100.0), 85.0, 100.0, Some(100.0)),
        device("Weight", "kg", (50.0, 100.0), 30.0, 200.0, None),
    ]
}

fn device(
    device_type: &str,
    unit: &str,
    normal: (f64, f64),
    critical_low: f64,
    critical_high: f64,
    ceiling: Option<f64>,
) -> DeviceSpec {
    DeviceSpec {
        device_type: device_type.to_string(),
        unit: unit.to_string(),
        normal_min: normal.0,
        normal_max: normal.1,
        critical_low,
        critical_high,
        ceiling,
    }
}

pub fn alert_templates() -> Vec<AlertTemplate> {
    vec![
        template(
            "Critical_Reading",
            AlertTargeting::PatientAndDoctor,
            &[
                "Patient BP extremely high.",
                "Blood oxygen level dropped below threshold.",
                "Abnormal heart rate detected.",
                "Glucose level critically low.",
                "High temperature alert detected.",
            ],
            [0.0, 0.0, 0.3, 0.7],
        ),
        template(
            "Appointment_Reminder",
            AlertTargeting::PatientOnly,
            &[
                "Upcoming appointment tomorrow at 10:00 AM.",
                "Reminder: Follow-up visit scheduled.",
                "You have a consultation in 2 hours.",
                "Please confirm your attendance for the next appointment.",
                "Doctor availability confirmed for your slot.",
            ],
            [0.6, 0.4, 0.0, 0.0],
        ),
        template(
            "Lab_Result",
            AlertTargeting::PatientMaybeDoctor,
            &[
                "New lab results available for viewing.",
                "Pathology report is ready.",
                "Blood test results uploaded.",
                "Urinalysis report completed.",
                "Please review recent X-Ray results.",
            ],
            [0.2, 0.6, 0.2, 0.0],
        ),
        template(
            "Medication_Reminder",
            AlertTargeting::PatientOnly,
            &[
                "Time to take your evening medication.",
                "Missed dose alert.",
                "Prescription refill reminder.",
                "Daily vitamin reminder.",
                "Please adhere to antibiotic schedule.",
            ],
            [0.3, 0.5, 0.2, 0.0],
        ),
        template(
            "Emergency",
            AlertTargeting::PatientAndDoctor,
            &[
                "SOS alert triggered by patient app.",
                "Fall detected!",
                "Patient called for immediate assistance.",
                "Emergency button pressed.",
                "System detected prolonged inactivity.",
            ],
            [0.0, 0.0, 0.1, 0.9],
        ),
    ]
}

fn template(
    alert_type: &str,
    targeting: AlertTargeting,
    messages: &[&str],
    weights: [f64; 4],
) -> AlertTemplate {
    AlertTemplate {
        alert_type: alert_type.to_string(),
        targeting,
        messages: strings(messages),
        severity_weights: SeverityWeights {
            low: weights[0],
            medium: weights[1],
            high: weights[2],
            critical: weights[3],
        },
    }
}
