use std::io::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::io::{BufReader, Lines, Stdin};

use admin_cell::{AdminService, ContactModerationService, PatientRosterController};
use appointment_cell::{AppointmentListController, DashboardService, ListScope};
use auth_cell::AuthService;
use booking_cell::{BookingApi, BookingController, SlotApply, SystemClock};
use doctor_cell::{AvailabilityEditor, DoctorDirectoryService};
use shared_http::ApiClient;
use shared_models::{
    AppointmentStatus, ContactInbox, LoginRequest, RegisterPatientRequest, Role, ScheduleDay,
};

type Input = Lines<BufReader<Stdin>>;

/// Interactive command loop. Every behavior lives in a cell controller;
/// this only parses lines, prompts, and prints.
pub struct Shell {
    api: Arc<ApiClient>,
    auth: AuthService,
    availability: Option<AvailabilityEditor>,
}

impl Shell {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&api)),
            api,
            availability: None,
        }
    }

    pub fn print_prompt(&self) {
        let role = self
            .api
            .session()
            .role()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "guest".to_string());
        print!("medibook({})> ", role);
        let _ = std::io::stdout().flush();
    }

    /// Returns false when the loop should exit.
    pub async fn handle(&mut self, line: &str, input: &mut Input) -> bool {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => return false,
            ["help"] => print_help(),
            ["login", role, email, password] => self.login(role, email, password).await,
            ["logout"] => {
                self.auth.logout();
                self.availability = None;
                println!("Logged out.");
            }
            ["register"] => self.register(input).await,
            ["doctors"] => self.doctors().await,
            ["book"] => self.book(input).await,
            ["appointments"] => self.appointments().await,
            ["status", id, status] => self.set_status(id, status).await,
            ["cancel", id] => self.cancel(id, input).await,
            ["availability"] => self.show_availability().await,
            ["availability", "set", day, start, end] => self.set_availability(day, start, end).await,
            ["availability", "save"] => self.save_availability().await,
            ["dashboard"] => self.dashboard().await,
            ["patients"] => self.patients().await,
            ["contacts", inbox] => self.contacts(inbox, None).await,
            ["contacts", inbox, "delete", id] => self.contacts(inbox, Some(*id)).await,
            _ => println!("Unknown command. Type 'help'."),
        }
        true
    }

    async fn login(&self, role: &str, email: &str, password: &str) {
        let Some(role) = parse_role(role) else {
            println!("Role must be one of: patient, doctor, admin");
            return;
        };

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.auth.login(role, request).await {
            Ok(response) => {
                let name = response.name.unwrap_or_else(|| email.to_string());
                println!("Welcome, {}.", name);
            }
            Err(err) => println!("Login failed: {}", err.user_message()),
        }
    }

    async fn register(&self, input: &mut Input) {
        let Some(name) = prompt(input, "Name: ").await else { return };
        let Some(email) = prompt(input, "Email: ").await else { return };
        let Some(phone) = prompt(input, "Phone: ").await else { return };
        let Some(password) = prompt(input, "Password: ").await else { return };

        let request = RegisterPatientRequest {
            name,
            email,
            phone,
            password,
            gender: None,
            dob: None,
        };
        match self.auth.register_patient(request).await {
            Ok(_) => println!("Registered. You can now log in."),
            Err(err) => println!("Registration failed: {}", err.user_message()),
        }
    }

    async fn doctors(&self) {
        let directory = DoctorDirectoryService::new(Arc::clone(&self.api));
        let result = if self.api.session().is_authenticated() {
            directory.list_for_patient().await
        } else {
            directory.list_public().await
        };

        match result {
            Ok(doctors) => {
                for doctor in &doctors {
                    println!("{}  {} ({})", doctor.id, doctor.name, doctor.specialization);
                }
                if doctors.is_empty() {
                    println!("No doctors found.");
                }
            }
            Err(err) => println!("Failed to load doctors: {}", err.user_message()),
        }
    }

    async fn book(&self, input: &mut Input) {
        let api: Arc<dyn BookingApi> = Arc::clone(&self.api) as Arc<dyn BookingApi>;
        let mut booking = BookingController::new(api, Arc::new(SystemClock));

        if let Err(err) = booking.load_doctors().await {
            println!("Failed to load doctors: {}", err.user_message());
            return;
        }
        for doctor in booking.doctors() {
            println!("{}  {} ({})", doctor.id, doctor.name, doctor.specialization);
        }

        let Some(doctor_id) = prompt(input, "Doctor id: ").await else { return };
        if let Err(err) = booking.select_doctor(doctor_id.trim()) {
            println!("{}", err.user_message());
            return;
        }

        let Some(raw_date) = prompt(input, "Date (YYYY-MM-DD): ").await else { return };
        let Ok(date) = raw_date.trim().parse::<NaiveDate>() else {
            println!("Not a valid date.");
            return;
        };

        if let Some(request) = booking.select_date(date) {
            if let SlotApply::Failed(message) = booking.refresh_slots(request).await {
                println!("Warning: {}", message);
            }
        }

        let slots = booking.slot_state().slots().to_vec();
        if slots.is_empty() {
            println!("No slots available for that day.");
            return;
        }
        println!("Available slots: {}", slots.join(", "));

        let Some(time) = prompt(input, "Time: ").await else { return };
        if let Err(err) = booking.select_time(time.trim()) {
            println!("{}", err.user_message());
            return;
        }

        let Some(symptoms) = prompt(input, "Symptoms: ").await else { return };
        booking.set_symptoms(symptoms.trim());

        match booking.submit().await {
            Ok(_) => println!("Appointment booked successfully!"),
            Err(err) => println!("Booking failed: {}", err.user_message()),
        }
    }

    async fn appointments(&self) {
        let Some(scope) = self.current_scope() else {
            println!("Log in first.");
            return;
        };

        let mut list = AppointmentListController::new(Arc::clone(&self.api), scope);
        if let Err(err) = list.refresh().await {
            println!("Failed to load appointments: {}", err.user_message());
            return;
        }

        if list.appointments().is_empty() {
            println!("No appointments found.");
            return;
        }
        for appt in list.appointments() {
            let cancellable = if list.can_cancel(&appt.id) { "  [cancellable]" } else { "" };
            println!(
                "{}  {} {}  {} / {}  {}{}",
                appt.id,
                appt.date,
                appt.time,
                appt.patient_name(),
                appt.doctor_name(),
                appt.status,
                cancellable
            );
        }
    }

    async fn set_status(&self, id: &str, status: &str) {
        let Some(scope) = self.current_scope() else {
            println!("Log in first.");
            return;
        };
        let Ok(status) = status.parse::<AppointmentStatus>() else {
            println!("Status must be one of: pending, completed, cancelled");
            return;
        };

        let mut list = AppointmentListController::new(Arc::clone(&self.api), scope);
        if let Err(err) = list.refresh().await {
            println!("Failed to load appointments: {}", err.user_message());
            return;
        }
        match list.set_status(id, status).await {
            Ok(confirmed) => println!("Appointment {} is now {}.", id, confirmed),
            Err(err) => println!("Failed to update status: {}", err.user_message()),
        }
    }

    async fn cancel(&self, id: &str, input: &mut Input) {
        let mut list = AppointmentListController::new(Arc::clone(&self.api), ListScope::Patient);
        if let Err(err) = list.refresh().await {
            println!("Failed to load appointments: {}", err.user_message());
            return;
        }

        if !list.can_cancel(id) {
            println!("Only pending appointments can be cancelled.");
            return;
        }

        // Destructive action: explicit confirmation before the request.
        let Some(answer) = prompt(input, "Cancel this appointment? [y/N] ").await else { return };
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Kept the appointment.");
            return;
        }

        match list.cancel(id).await {
            Ok(()) => println!("Your appointment has been cancelled."),
            Err(err) => println!("Failed to cancel: {}", err.user_message()),
        }
    }

    async fn show_availability(&mut self) {
        match self.availability_editor().await {
            Some(editor) => {
                for slot in editor.week() {
                    if slot.is_open() {
                        println!("{:<10} {} - {}", slot.day.to_string(), slot.start_time, slot.end_time);
                    } else {
                        println!("{:<10} unavailable", slot.day.to_string());
                    }
                }
            }
            None => println!("Failed to load availability."),
        }
    }

    async fn set_availability(&mut self, day: &str, start: &str, end: &str) {
        let Some(day) = parse_day(day) else {
            println!("Unknown weekday: {}", day);
            return;
        };
        let start = start.to_string();
        let end = end.to_string();
        match self.availability_editor().await {
            Some(editor) => {
                editor.set_day(day, &start, &end);
                println!("{} set to {} - {} (not saved yet).", day, start, end);
            }
            None => println!("Failed to load availability."),
        }
    }

    async fn save_availability(&mut self) {
        match self.availability_editor().await {
            Some(editor) => match editor.save().await {
                Ok(()) => println!("Availability updated successfully."),
                Err(err) => println!("{}", err.user_message()),
            },
            None => println!("Failed to load availability."),
        }
    }

    async fn availability_editor(&mut self) -> Option<&mut AvailabilityEditor> {
        if self.availability.is_none() {
            let mut editor = AvailabilityEditor::new(Arc::clone(&self.api));
            if let Err(err) = editor.load().await {
                println!("{}", err.user_message());
                return None;
            }
            self.availability = Some(editor);
        }
        self.availability.as_mut()
    }

    async fn dashboard(&self) {
        let dashboards = DashboardService::new(Arc::clone(&self.api));
        match self.api.session().role() {
            Some(Role::Patient) => match dashboards.patient_overview().await {
                Ok(overview) => {
                    println!("Hello, {}.", overview.profile.name);
                    match overview.upcoming {
                        Some(appt) => println!(
                            "Next appointment: {} {} with {}",
                            appt.date,
                            appt.time,
                            appt.doctor_name()
                        ),
                        None => println!("No upcoming appointment."),
                    }
                }
                Err(err) => println!("Failed to load dashboard: {}", err.user_message()),
            },
            Some(Role::Doctor) => match dashboards.doctor_dashboard().await {
                Ok(stats) => {
                    println!(
                        "total {}  today {}  pending {}  completed {}  cancelled {}",
                        stats.total_appointments,
                        stats.today_appointments,
                        stats.pending_appointments,
                        stats.completed_appointments,
                        stats.cancelled_appointments
                    );
                }
                Err(err) => println!("Failed to load dashboard: {}", err.user_message()),
            },
            Some(Role::Admin) => match AdminService::new(Arc::clone(&self.api)).stats().await {
                Ok(stats) => {
                    println!(
                        "patients {}  doctors {}  appointments {} ({} today)",
                        stats.total_patients,
                        stats.total_doctors,
                        stats.total_appointments,
                        stats.today_appointments
                    );
                    for entry in &stats.status_counts {
                        println!("  {}: {}", entry.status, entry.count);
                    }
                }
                Err(err) => println!("Failed to load stats: {}", err.user_message()),
            },
            None => println!("Log in first."),
        }
    }

    async fn patients(&self) {
        match self.api.session().role() {
            Some(Role::Doctor) => {
                let directory = DoctorDirectoryService::new(Arc::clone(&self.api));
                match directory.my_patients().await {
                    Ok(patients) => {
                        for patient in &patients {
                            println!(
                                "{}  {}  {}",
                                patient.id,
                                patient.name,
                                patient.phone.as_deref().unwrap_or("-")
                            );
                        }
                    }
                    Err(err) => println!("Failed to load patients: {}", err.user_message()),
                }
            }
            Some(Role::Admin) => {
                let mut roster = PatientRosterController::new(Arc::clone(&self.api));
                match roster.refresh().await {
                    Ok(()) => {
                        for patient in roster.patients() {
                            println!(
                                "{}  {}  {}",
                                patient.id,
                                patient.name,
                                patient.phone.as_deref().unwrap_or("-")
                            );
                        }
                    }
                    Err(err) => println!("Failed to load patients: {}", err.user_message()),
                }
            }
            _ => println!("Log in as a doctor or admin first."),
        }
    }

    async fn contacts(&self, inbox: &str, delete_id: Option<&str>) {
        let inbox = match inbox {
            "public" => ContactInbox::Public,
            "patient" => ContactInbox::Patient,
            _ => {
                println!("Inbox must be 'public' or 'patient'.");
                return;
            }
        };

        let moderation = ContactModerationService::new(Arc::clone(&self.api));
        match delete_id {
            Some(id) => match moderation.delete(inbox, id).await {
                Ok(()) => println!("Message deleted."),
                Err(err) => println!("Failed to delete: {}", err.user_message()),
            },
            None => match moderation.list(inbox).await {
                Ok(messages) => {
                    for message in &messages {
                        println!("{}  {}: {}", message.id, message.name, message.message);
                    }
                    if messages.is_empty() {
                        println!("Inbox is empty.");
                    }
                }
                Err(err) => println!("Failed to load messages: {}", err.user_message()),
            },
        }
    }

    fn current_scope(&self) -> Option<ListScope> {
        match self.api.session().role()? {
            Role::Patient => Some(ListScope::Patient),
            Role::Doctor => Some(ListScope::Doctor),
            Role::Admin => Some(ListScope::Admin),
        }
    }
}

async fn prompt(input: &mut Input, label: &str) -> Option<String> {
    print!("{}", label);
    let _ = std::io::stdout().flush();
    match input.next_line().await {
        Ok(Some(line)) => Some(line),
        _ => None,
    }
}

fn parse_role(raw: &str) -> Option<Role> {
    match raw.to_lowercase().as_str() {
        "patient" => Some(Role::Patient),
        "doctor" => Some(Role::Doctor),
        "admin" => Some(Role::Admin),
        _ => None,
    }
}

fn parse_day(raw: &str) -> Option<ScheduleDay> {
    ScheduleDay::ALL
        .iter()
        .copied()
        .find(|day| day.as_str().eq_ignore_ascii_case(raw))
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 login <patient|doctor|admin> <email> <password>\n\
         \x20 logout | register | doctors | book | appointments\n\
         \x20 status <id> <pending|completed|cancelled>   (doctor/admin)\n\
         \x20 cancel <id>                                 (patient)\n\
         \x20 availability [set <Day> <HH:MM> <HH:MM> | save]\n\
         \x20 dashboard | patients | contacts <public|patient> [delete <id>]\n\
         \x20 quit"
    );
}
