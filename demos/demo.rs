use chrono::{Duration, Local, NaiveDate};
use medistore::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Medistore Demo\n");

    // Environment > settings file > local defaults
    let config = AppConfig::load()?;
    println!("✅ Configuration loaded ({})", config.database.url);

    let medistore = Medistore::connect(config).await?;
    medistore.health_check().await?;
    println!("✅ Database connected\n");

    // Suffix demo rows so reruns do not trip the unique constraints
    let run = std::process::id();

    println!("=== Departments ===");
    let departments = medistore.departments();
    let department_id = departments
        .save(&Department {
            department_id: None,
            name: format!("Cardiology {}", run),
            phone: format!("011-{:04}", run % 10_000),
        })
        .await?;
    println!("Created department #{}", department_id);

    println!("\n=== Doctors ===");
    let doctors = medistore.doctors();
    let doctor = Doctor {
        doctor_id: None,
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: format!("grace-{}@hospital.demo", run),
        phone: format!("555-{:06}", run % 1_000_000),
        department_id: Some(department_id),
    };
    let doctor_id = doctors.save(&doctor).await?;
    println!("Created doctor #{}", doctor_id);

    // The same email again trips the unique constraint
    let duplicate = Doctor {
        doctor_id: None,
        ..doctor.clone()
    };
    match doctors.save(&duplicate).await {
        Err(StoreError::Constraint { kind, .. }) => println!("Duplicate rejected ({:?})", kind),
        other => println!("Expected a constraint violation, got {:?}", other),
    }

    // Validation fires before any statement reaches the database
    let unnamed = Doctor {
        first_name: String::new(),
        ..doctor.clone()
    };
    match doctors.save(&unnamed).await {
        Err(StoreError::Validation(message)) => println!("Validation rejected: {}", message),
        other => println!("Expected a validation failure, got {:?}", other),
    }

    println!("\n=== Patients ===");
    let patients = medistore.patients();
    let patient_id = patients
        .save(&Patient {
            patient_id: None,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: format!("ada-{}@hospital.demo", run),
            phone: format!("556-{:06}", run % 1_000_000),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10),
            address: "12 Analytical Row".to_string(),
            registered_at: None,
        })
        .await?;
    println!("Registered patient #{}", patient_id);

    println!("\n=== Search & Paging ===");
    let mut screen = EntityController::new(medistore.patients(), "patient").with_page_size(10);
    screen.search("ada").await;
    println!(
        "Text search: {} (page {} of {})",
        screen.status().text,
        screen.view().page_index + 1,
        screen.view().page_count
    );

    // A digits-only term is an id probe, not a text match
    screen.search(&patient_id.to_string()).await;
    println!("Id probe: {} row(s)", screen.view().rows.len());

    println!("\n=== Appointments ===");
    let appointments = medistore.appointments();
    let appointment_id = appointments
        .save(&Appointment {
            appointment_id: None,
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            scheduled_at: Some(Local::now().naive_local() + Duration::days(3)),
            reason: "Routine checkup".to_string(),
        })
        .await?;
    println!("Scheduled appointment #{}", appointment_id);

    println!("\n=== Inventory & Prescriptions ===");
    let inventory = medistore.inventory();
    let inventory_id = inventory
        .save(&MedicalInventory {
            inventory_id: None,
            name: format!("Aspirin {}", run),
            item_type: "Tablet".to_string(),
            quantity: 500,
            unit: "box".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            cost: 4.75,
        })
        .await?;
    println!("Stocked inventory item #{}", inventory_id);

    let prescriptions = medistore.prescriptions();
    let prescription = Prescription {
        prescription_id: None,
        patient_id: Some(patient_id),
        doctor_id: Some(doctor_id),
        prescribed_on: Some(Local::now().date_naive()),
        notes: "After meals".to_string(),
    };
    let items = vec![PrescriptionItem {
        item_id: None,
        prescription_id: None,
        inventory_id: Some(inventory_id),
        dosage: "100mg twice daily".to_string(),
        duration_days: 7,
    }];
    let prescription_id = prescriptions.save_with_items(&prescription, &items).await?;
    let lines = prescriptions.items(prescription_id).await?;
    println!(
        "Issued prescription #{} with {} line(s)",
        prescription_id,
        lines.len()
    );

    println!("\n=== Feedback ===");
    let feedback = medistore.feedback();
    let feedback_id = feedback
        .save(&PatientFeedback {
            feedback_id: None,
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            rating: 5,
            comments: "Very attentive".to_string(),
            submitted_at: None,
        })
        .await?;
    println!("Recorded feedback #{}", feedback_id);

    println!("\n=== Cache ===");
    let start = std::time::Instant::now();
    let _ = doctors.get(doctor_id).await?;
    let first = start.elapsed();

    let start = std::time::Instant::now();
    let _ = doctors.get(doctor_id).await?;
    let second = start.elapsed();

    println!("Cache test - First: {:?}, Second: {:?}", first, second);
    if first > second {
        println!("✅ Cache working!");
    }
    println!("Cache stats: {}", medistore.cache_stats().await);

    println!("\n=== Cleanup ===");
    feedback.delete(feedback_id).await?;
    appointments.delete(appointment_id).await?;
    prescriptions.delete(prescription_id).await?;
    inventory.delete(inventory_id).await?;
    patients.delete(patient_id).await?;
    doctors.delete(doctor_id).await?;
    departments.delete(department_id).await?;
    println!("Demo rows removed");

    medistore.health_check().await?;
    println!("\n🎉 Demo completed successfully!");

    Ok(())
}
