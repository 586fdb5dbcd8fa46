use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::api::appointments::{self, Appointment, NewAppointment};
use crate::api::auth::{self, Credentials, PatientRegistration};
use crate::api::doctors::{self, NewDoctor};
use crate::api::patients::{self, NewPatient};
use crate::api::prescriptions::{self, Prescription};
use crate::auth::Role;
use crate::config::Config;
use crate::error::ClientError;
use crate::routes::Page;
use crate::session::Session;
use crate::utils::sanitize::mask_token;
use crate::validation::ValidationError;
use crate::AppState;

#[derive(Parser)]
#[command(name = "medicare-hub")]
#[command(about = "MediCare Hub - hospital management client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a role-specific account
    Login {
        #[arg(short, long)]
        role: Role,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create a patient account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: NaiveDate,
    },

    /// Forget the stored credential
    Logout,

    /// Show the current session
    Whoami,

    /// Evaluate the route guard for a page path
    Route {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Patient management (admin)
    #[command(subcommand)]
    Patients(PatientCommands),

    /// Doctor management (admin)
    #[command(subcommand)]
    Doctors(DoctorCommands),

    /// Appointment listings and scheduling
    #[command(subcommand)]
    Appointments(AppointmentCommands),

    /// Prescriptions of a patient
    Prescriptions {
        /// Defaults to the patient id carried by the credential
        #[arg(long)]
        patient_id: Option<i64>,
    },

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum PatientCommands {
    /// List all patients
    List,

    /// Register a patient on their behalf
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
    },

    /// Remove a patient
    Delete {
        #[arg(value_name = "PATIENT_ID")]
        patient_id: i64,
    },

    /// Show a patient's prescriptions
    Prescriptions {
        #[arg(value_name = "PATIENT_ID")]
        patient_id: i64,
    },
}

#[derive(Subcommand)]
pub enum DoctorCommands {
    /// List all doctors
    List,

    /// Add a doctor
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        specialization: String,
        #[arg(long)]
        room_number: Option<String>,
    },

    /// Remove a doctor
    Delete {
        #[arg(value_name = "DOCTOR_ID")]
        doctor_id: i64,
    },

    /// Show a doctor's appointments
    Appointments {
        #[arg(value_name = "DOCTOR_ID")]
        doctor_id: i64,
    },
}

#[derive(Subcommand)]
pub enum AppointmentCommands {
    /// Appointments on a given day (admin)
    Day {
        /// Defaults to today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Schedule an appointment (admin)
    Schedule {
        #[arg(long)]
        date: NaiveDate,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: String,
        #[arg(long)]
        doctor_id: i64,
        #[arg(long)]
        patient_id: i64,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// The logged-in doctor's appointments
    Doctor {
        /// Defaults to the doctor id carried by the credential
        #[arg(long)]
        doctor_id: Option<i64>,
    },

    /// The logged-in patient's appointments
    Mine,
}

pub async fn run(state: &AppState, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Login {
            role,
            email,
            password,
        } => handle_login(state, role, Credentials::new(email, password)).await,
        Commands::Register {
            name,
            email,
            password,
            phone,
            address,
            date_of_birth,
        } => {
            let registration = PatientRegistration {
                name,
                email,
                password,
                phone,
                address,
                date_of_birth,
            };
            handle_register(state, &registration).await
        }
        Commands::Logout => handle_logout(state),
        Commands::Whoami => {
            handle_whoami(state);
            Ok(())
        }
        Commands::Route { path } => {
            handle_route(state, &path);
            Ok(())
        }
        Commands::Patients(command) => handle_patients(state, command).await,
        Commands::Doctors(command) => handle_doctors(state, command).await,
        Commands::Appointments(command) => handle_appointments(state, command).await,
        Commands::Prescriptions { patient_id } => {
            state.enter(Page::PatientDashboard)?;
            let patient_id = match patient_id {
                Some(id) => id,
                None => own_id(&state.session.current(), |user| user.patient_id(), "patientId")?,
            };
            print_prescriptions(&prescriptions::for_patient(&state.api, patient_id).await?);
            Ok(())
        }
        // Handled before state is built.
        Commands::Config => Ok(()),
    }
}

async fn handle_login(
    state: &AppState,
    role: Role,
    credentials: Credentials,
) -> Result<(), ClientError> {
    let outcome = auth::login(&state.api, role, &credentials).await?;
    println!("✓ Login successful as {}", outcome.claims.role);
    println!("  Landing page: {}", outcome.landing);
    Ok(())
}

async fn handle_register(
    state: &AppState,
    registration: &PatientRegistration,
) -> Result<(), ClientError> {
    let outcome = auth::register_patient(&state.api, registration).await?;
    println!("✓ Registration successful");
    println!("  Landing page: {}", outcome.landing);
    Ok(())
}

fn handle_logout(state: &AppState) -> Result<(), ClientError> {
    auth::logout(&state.api)?;
    println!("✓ Logged out");
    Ok(())
}

fn handle_whoami(state: &AppState) {
    let session = state.session.current();
    let Some(user) = session.user() else {
        println!("Not logged in");
        return;
    };

    println!("Logged in as {}", user.role());
    if let Some(name) = user.name() {
        println!("  Name: {}", name);
    }
    if let Some(subject) = user.subject() {
        println!("  Subject: {}", subject);
    }
    if let Some(id) = user.patient_id() {
        println!("  Patient ID: {}", id);
    }
    if let Some(id) = user.doctor_id() {
        println!("  Doctor ID: {}", id);
    }
    if let Some(expires_at) = user.expires_at() {
        println!("  Expires: {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(token) = state.session.token() {
        println!("  Credential: {}", mask_token(&token));
    }
}

fn handle_route(state: &AppState, path: &str) {
    let navigation = state.guard.navigate(path);
    if navigation.decision.is_allowed() {
        println!("✓ {} renders {:?}", path, navigation.route.page);
    } else {
        println!("✗ {} redirects to {}", path, navigation.destination());
    }
}

async fn handle_patients(state: &AppState, command: PatientCommands) -> Result<(), ClientError> {
    state.enter(Page::AdminPatients)?;

    match command {
        PatientCommands::List => {
            let patients = patients::list(&state.api).await?;
            if patients.is_empty() {
                println!("No patients found");
                return Ok(());
            }

            println!("{:<8} {:<28} {:<32} {:<16}", "ID", "Name", "Email", "Phone");
            println!("{}", "-".repeat(86));
            for patient in patients {
                println!(
                    "{:<8} {:<28} {:<32} {:<16}",
                    patient.patient_id,
                    patient.name,
                    patient.email.unwrap_or_default(),
                    patient.phone.unwrap_or_default()
                );
            }
        }
        PatientCommands::Add {
            name,
            email,
            password,
            phone,
            address,
            date_of_birth,
        } => {
            let patient = NewPatient {
                name,
                email,
                password,
                phone,
                address,
                date_of_birth,
            };
            patients::create(&state.api, &patient).await?;
            println!("✓ Patient added successfully");
        }
        PatientCommands::Delete { patient_id } => {
            patients::delete(&state.api, patient_id).await?;
            println!("✓ Patient {} deleted", patient_id);
        }
        PatientCommands::Prescriptions { patient_id } => {
            print_prescriptions(&prescriptions::for_patient(&state.api, patient_id).await?);
        }
    }

    Ok(())
}

async fn handle_doctors(state: &AppState, command: DoctorCommands) -> Result<(), ClientError> {
    state.enter(Page::AdminDoctors)?;

    match command {
        DoctorCommands::List => {
            let doctors = doctors::list(&state.api).await?;
            if doctors.is_empty() {
                println!("No doctors found");
                return Ok(());
            }

            println!("{:<8} {:<28} {:<24} {:<8}", "ID", "Name", "Specialization", "Room");
            println!("{}", "-".repeat(70));
            for doctor in doctors {
                println!(
                    "{:<8} {:<28} {:<24} {:<8}",
                    doctor.id,
                    doctor.name,
                    doctor.specialization.unwrap_or_default(),
                    doctor.room_number.unwrap_or_default()
                );
            }
        }
        DoctorCommands::Add {
            name,
            email,
            password,
            phone,
            specialization,
            room_number,
        } => {
            let doctor = NewDoctor {
                name,
                email,
                password,
                phone,
                specialization,
                room_number,
            };
            doctors::create(&state.api, &doctor).await?;
            println!("✓ Doctor added successfully");
        }
        DoctorCommands::Delete { doctor_id } => {
            doctors::delete(&state.api, doctor_id).await?;
            println!("✓ Doctor {} deleted", doctor_id);
        }
        DoctorCommands::Appointments { doctor_id } => {
            print_appointments(&appointments::for_doctor(&state.api, doctor_id).await?);
        }
    }

    Ok(())
}

async fn handle_appointments(
    state: &AppState,
    command: AppointmentCommands,
) -> Result<(), ClientError> {
    match command {
        AppointmentCommands::Day { date } => {
            state.enter(Page::AdminTodayAppointments)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            print_appointments(&appointments::for_date(&state.api, date).await?);
        }
        AppointmentCommands::Schedule {
            date,
            time,
            doctor_id,
            patient_id,
            reason,
        } => {
            state.enter(Page::AdminScheduleAppointment)?;
            let appointment =
                NewAppointment::new(date, time, doctor_id, patient_id).with_reason(reason);
            appointments::create(&state.api, &appointment).await?;
            println!("✓ Appointment scheduled successfully");
        }
        AppointmentCommands::Doctor { doctor_id } => {
            state.enter(Page::DoctorDashboard)?;
            let doctor_id = match doctor_id {
                Some(id) => id,
                None => own_id(&state.session.current(), |user| user.doctor_id(), "doctorId")?,
            };
            print_appointments(&appointments::for_doctor(&state.api, doctor_id).await?);
        }
        AppointmentCommands::Mine => {
            state.enter(Page::PatientDashboard)?;
            print_appointments(&appointments::mine(&state.api).await?);
        }
    }

    Ok(())
}

/// Reads an id claim, falling back to a numeric subject.
fn own_id(
    session: &Session,
    claim: impl Fn(&crate::session::Identity) -> Option<i64>,
    field: &'static str,
) -> Result<i64, ClientError> {
    session
        .user()
        .and_then(|user| claim(user).or_else(|| user.subject().and_then(|s| s.parse().ok())))
        .ok_or_else(|| {
            ValidationError::new(field, "not present in the credential, pass it explicitly").into()
        })
}

fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No appointments found");
        return;
    }

    println!(
        "{:<8} {:<12} {:<8} {:<10} {:<10} {:<24}",
        "ID", "Date", "Time", "Status", "Doctor", "Patient"
    );
    println!("{}", "-".repeat(76));
    for appointment in appointments {
        let patient = match (&appointment.patient_name, appointment.patient_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("ID: {}", id),
            (None, None) => "-".to_string(),
        };
        println!(
            "{:<8} {:<12} {:<8} {:<10} {:<10} {:<24}",
            appointment.appointment_id,
            appointment.date.format("%Y-%m-%d").to_string(),
            appointment.time.as_deref().unwrap_or("-"),
            appointment.status.to_string(),
            appointment
                .doctor_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            patient
        );
    }
}

fn print_prescriptions(prescriptions: &[Prescription]) {
    if prescriptions.is_empty() {
        println!("No prescriptions found");
        return;
    }

    for prescription in prescriptions {
        println!("{}", prescription.medication);
        if let Some(dosage) = &prescription.dosage {
            println!("  Dosage: {}", dosage);
        }
        if let Some(instructions) = &prescription.instructions {
            println!("  Instructions: {}", instructions);
        }
        if let Some(doctor_id) = prescription.doctor_id {
            println!("  Prescribed by: Dr. {}", doctor_id);
        }
        if let Some(date) = &prescription.date {
            println!("  Date: {}", date);
        }
    }
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  API Base URL: {}", config.api_base_url);
    println!("  Session File: {}", config.session_file.display());
    println!("  HTTP Timeout: {}s", config.http_timeout.as_secs());
    println!("  Enforce Credential Expiry: {}", config.enforce_expiry);
    println!("  Log Request Bodies: {}", config.log_request_body);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}
