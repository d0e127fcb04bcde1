//! Patients, billable catalog, and schemes available to the billing desk.
//!
//! The hospital registry is external to this service; the directory ships a
//! fixed seed set and answers lookups with linear substring scans.

use rust_decimal::Decimal;
use service_core::utils::matches_query;
use uuid::Uuid;

use crate::models::{CatalogItem, Gender, ItemType, Patient, Scheme, SchemeKind};

/// Stable ids for seed records: high 32 bits name the record family.
const PATIENT_NAMESPACE: u128 = 0x5041_5449 << 96;
const SCHEME_NAMESPACE: u128 = 0x5343_484d << 96;

pub fn seed_patient_id(n: u32) -> Uuid {
    Uuid::from_u128(PATIENT_NAMESPACE | n as u128)
}

pub fn seed_scheme_id(n: u32) -> Uuid {
    Uuid::from_u128(SCHEME_NAMESPACE | n as u128)
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    patients: Vec<Patient>,
    catalog: Vec<CatalogItem>,
    schemes: Vec<Scheme>,
}

impl Directory {
    pub fn new(patients: Vec<Patient>, catalog: Vec<CatalogItem>, schemes: Vec<Scheme>) -> Self {
        Self {
            patients,
            catalog,
            schemes,
        }
    }

    /// Directory populated with the built-in seed records.
    pub fn seeded() -> Self {
        Self::new(seed_patients(), seed_catalog(), seed_schemes())
    }

    pub fn patient(&self, patient_id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }

    /// Patients whose name, UHID, or phone contains `query`.
    pub fn search_patients(&self, query: Option<&str>, limit: usize) -> Vec<Patient> {
        self.patients
            .iter()
            .filter(|p| matches_query(query, &[&p.name, &p.uhid, &p.phone]))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Catalog entries whose name or code contains `query`, optionally
    /// restricted to one item type.
    pub fn search_catalog(
        &self,
        query: Option<&str>,
        item_type: Option<ItemType>,
        limit: usize,
    ) -> Vec<CatalogItem> {
        self.catalog
            .iter()
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .filter(|item| matches_query(query, &[&item.name, &item.code]))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn scheme(&self, scheme_id: Uuid) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.scheme_id == scheme_id)
    }
}

fn patient(
    n: u32,
    name: &str,
    age: u8,
    gender: Gender,
    phone: &str,
    blood_group: Option<&str>,
) -> Patient {
    Patient {
        patient_id: seed_patient_id(n),
        uhid: format!("UHID-{:05}", n),
        name: name.to_string(),
        age,
        gender,
        phone: phone.to_string(),
        blood_group: blood_group.map(str::to_string),
    }
}

fn seed_patients() -> Vec<Patient> {
    vec![
        patient(1, "Ravi Kumar", 45, Gender::Male, "9876543210", Some("B+")),
        patient(2, "Priya Sharma", 32, Gender::Female, "9812345678", Some("O+")),
        patient(3, "Mohammed Irfan", 58, Gender::Male, "9900112233", Some("A-")),
        patient(4, "Lakshmi Narayanan", 67, Gender::Female, "9445566778", None),
        patient(5, "Arjun Reddy", 29, Gender::Male, "9123456780", Some("AB+")),
        patient(6, "Sneha Patil", 8, Gender::Female, "9988776655", Some("O-")),
        patient(7, "Gurpreet Singh", 51, Gender::Male, "9811122233", Some("B-")),
        patient(8, "Anjali Menon", 40, Gender::Female, "9747012345", Some("A+")),
    ]
}

fn catalog_item(
    code: &str,
    name: &str,
    item_type: ItemType,
    department: &str,
    unit_price: i64,
    tax_rate: i64,
) -> CatalogItem {
    CatalogItem {
        code: code.to_string(),
        name: name.to_string(),
        item_type,
        department: department.to_string(),
        unit_price: Decimal::from(unit_price),
        tax_rate: Decimal::from(tax_rate),
    }
}

fn seed_catalog() -> Vec<CatalogItem> {
    use ItemType::*;
    vec![
        catalog_item("CONS-GEN", "General Physician Consultation", Consultation, "General Medicine", 500, 18),
        catalog_item("CONS-CARD", "Cardiology Consultation", Consultation, "Cardiology", 1200, 18),
        catalog_item("CONS-PED", "Pediatric Consultation", Consultation, "Pediatrics", 700, 18),
        catalog_item("LAB-CBC", "Complete Blood Count", LabTest, "Pathology", 350, 18),
        catalog_item("LAB-LFT", "Liver Function Test", LabTest, "Pathology", 800, 18),
        catalog_item("LAB-HBA1C", "HbA1c", LabTest, "Pathology", 550, 18),
        catalog_item("LAB-TSH", "Thyroid Stimulating Hormone", LabTest, "Pathology", 450, 18),
        catalog_item("PROC-ECG", "Electrocardiogram", Procedure, "Cardiology", 300, 18),
        catalog_item("PROC-XRAY-CHEST", "Chest X-Ray", Procedure, "Radiology", 600, 18),
        catalog_item("PROC-USG-ABD", "Ultrasound Abdomen", Procedure, "Radiology", 1500, 18),
        catalog_item("MED-PCM-500", "Paracetamol 500mg (strip of 10)", Medicine, "Pharmacy", 30, 12),
        catalog_item("MED-AMOX-500", "Amoxicillin 500mg (strip of 10)", Medicine, "Pharmacy", 120, 12),
        catalog_item("MED-INS-GLAR", "Insulin Glargine 100IU/ml", Medicine, "Pharmacy", 780, 5),
        catalog_item("BED-GEN", "General Ward Bed (per day)", BedCharge, "Inpatient", 1500, 18),
        catalog_item("BED-ICU", "ICU Bed (per day)", BedCharge, "Critical Care", 8000, 18),
        catalog_item("SRV-NURSING", "Nursing Care (per day)", Service, "Nursing", 600, 18),
        catalog_item("SRV-AMBULANCE", "Ambulance Service", Service, "Emergency", 1500, 18),
    ]
}

fn scheme(n: u32, code: &str, name: &str, kind: SchemeKind, coverage_percent: i64) -> Scheme {
    Scheme {
        scheme_id: seed_scheme_id(n),
        code: code.to_string(),
        name: name.to_string(),
        kind,
        coverage_percent: Decimal::from(coverage_percent),
    }
}

fn seed_schemes() -> Vec<Scheme> {
    vec![
        scheme(1, "PMJAY", "Ayushman Bharat PM-JAY", SchemeKind::Government, 100),
        scheme(2, "CGHS", "Central Government Health Scheme", SchemeKind::Government, 80),
        scheme(3, "ECHS", "Ex-Servicemen Contributory Health Scheme", SchemeKind::Government, 90),
        scheme(4, "STAR-FHO", "Star Health Family Health Optima", SchemeKind::Insurance, 70),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_search_matches_name_uhid_and_phone() {
        let directory = Directory::seeded();

        let by_name = directory.search_patients(Some("sharma"), 20);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Priya Sharma");

        let by_uhid = directory.search_patients(Some("uhid-00003"), 20);
        assert_eq!(by_uhid[0].name, "Mohammed Irfan");

        let by_phone = directory.search_patients(Some("98111"), 20);
        assert_eq!(by_phone[0].name, "Gurpreet Singh");
    }

    #[test]
    fn blank_search_returns_seed_order_up_to_limit() {
        let directory = Directory::seeded();
        let patients = directory.search_patients(None, 3);

        let names: Vec<&str> = patients.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ravi Kumar", "Priya Sharma", "Mohammed Irfan"]);
    }

    #[test]
    fn catalog_search_filters_by_type() {
        let directory = Directory::seeded();

        let labs = directory.search_catalog(None, Some(ItemType::LabTest), 50);
        assert_eq!(labs.len(), 4);
        assert!(labs.iter().all(|i| i.item_type == ItemType::LabTest));

        let cardio = directory.search_catalog(Some("cardiology"), None, 50);
        assert_eq!(cardio.len(), 1);
        assert_eq!(cardio[0].code, "CONS-CARD");

        let none = directory.search_catalog(Some("insulin"), Some(ItemType::LabTest), 50);
        assert!(none.is_empty());
    }

    #[test]
    fn lookups_by_id() {
        let directory = Directory::seeded();

        assert_eq!(
            directory.patient(seed_patient_id(5)).map(|p| p.name.as_str()),
            Some("Arjun Reddy")
        );
        assert!(directory.patient(Uuid::new_v4()).is_none());
        assert_eq!(
            directory.scheme(seed_scheme_id(2)).map(|s| s.code.as_str()),
            Some("CGHS")
        );
    }
}
