//! Employee Discord commands - roster management.
//!
//! Employees are referenced by name or code; the name parameter autocompletes
//! from the roster. Validation lives in `core::employee`, and its errors are
//! answered inline by the framework error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            employee::{self as roster, ComponentKind, EmployeeUpdate, NewEmployee},
            report::format_money,
        },
        entities::employee::PayComponents,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Allowance or deduction, as offered in the command picker
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ComponentChoice {
        Allowance,
        Deduction,
    }

    impl From<ComponentChoice> for ComponentKind {
        fn from(choice: ComponentChoice) -> Self {
            match choice {
                ComponentChoice::Allowance => Self::Allowance,
                ComponentChoice::Deduction => Self::Deduction,
            }
        }
    }

    fn format_components(components: &PayComponents) -> String {
        if components.is_empty() {
            return "_none_".to_string();
        }
        components
            .0
            .iter()
            .map(|c| format!("{} {}", c.label, format_money(c.amount)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parent command for managing the employee roster.
    #[poise::command(
        slash_command,
        subcommands(
            "employee_add",
            "employee_list",
            "employee_info",
            "employee_update",
            "employee_allowance",
            "employee_deduction",
            "employee_remove_component",
            "employee_delete"
        )
    )]
    pub async fn employee(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Employee management command. Available subcommands:\n\
            `/employee add` - Add an employee\n\
            `/employee list` - List the roster\n\
            `/employee info` - Show one employee's pay structure\n\
            `/employee update` - Change name, department, designation, photo or basic salary\n\
            `/employee allowance` - Add an allowance line\n\
            `/employee deduction` - Add a deduction line\n\
            `/employee remove_component` - Remove an allowance or deduction line\n\
            `/employee delete` - Remove an employee with their payslips and overtime";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds an employee to the roster.
    #[poise::command(slash_command, rename = "add")]
    pub async fn employee_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique employee code (e.g. EMP-014)"] code: String,
        #[description = "Full name"] name: String,
        #[description = "Monthly basic salary"] basic_salary: f64,
        #[description = "Department"] department: Option<String>,
        #[description = "Designation / job title"] designation: Option<String>,
        #[description = "Photo URL"] photo_url: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let created = roster::create_employee(
            db,
            NewEmployee {
                employee_code: code,
                name,
                department: department.unwrap_or_default(),
                designation: designation.unwrap_or_default(),
                photo_url,
                basic_salary,
                ..NewEmployee::default()
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Added **{}** ({}) with basic salary {}.",
            created.name,
            created.employee_code,
            format_money(created.basic_salary)
        ))
        .await?;
        Ok(())
    }

    /// Lists all employees.
    #[poise::command(slash_command, rename = "list")]
    pub async fn employee_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let employees = roster::get_all_employees(db).await?;

        if employees.is_empty() {
            ctx.say("👥 No employees yet. Add one with `/employee add`.")
                .await?;
            return Ok(());
        }

        let mut response = format!("👥 **Employees ({})**\n\n", employees.len());
        for emp in &employees {
            let department = if emp.department.is_empty() {
                "-"
            } else {
                emp.department.as_str()
            };
            writeln!(
                &mut response,
                "• **{}** `{}` - {department} - basic {}",
                emp.name,
                emp.employee_code,
                format_money(emp.basic_salary)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows one employee's details and pay structure.
    #[poise::command(slash_command, rename = "info")]
    pub async fn employee_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let emp = roster::find_employee(db, &employee).await?;

        let mut response = format!("📋 **{}** (`{}`)\n\n", emp.name, emp.employee_code);
        writeln!(&mut response, "🏭 Department: {}", emp.department)?;
        writeln!(&mut response, "🧰 Designation: {}", emp.designation)?;
        writeln!(
            &mut response,
            "💰 Basic salary: {}",
            format_money(emp.basic_salary)
        )?;
        writeln!(
            &mut response,
            "➕ Allowances ({}): {}",
            format_money(emp.total_allowances()),
            format_components(&emp.allowances)
        )?;
        writeln!(
            &mut response,
            "➖ Deductions ({}): {}",
            format_money(emp.total_deductions()),
            format_components(&emp.deductions)
        )?;
        if let Some(photo) = &emp.photo_url {
            writeln!(&mut response, "🖼️ Photo: {photo}")?;
        }
        writeln!(
            &mut response,
            "📅 On roster since {}",
            emp.created_at.format("%Y-%m-%d")
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Updates an employee's details.
    #[poise::command(slash_command, rename = "update")]
    pub async fn employee_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New department"] department: Option<String>,
        #[description = "New designation"] designation: Option<String>,
        #[description = "New photo URL (empty to clear)"] photo_url: Option<String>,
        #[description = "New monthly basic salary"] basic_salary: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let update = EmployeeUpdate {
            name,
            department,
            designation,
            photo_url,
            basic_salary,
        };
        if update.is_empty() {
            ctx.say("ℹ️ Nothing to update. Provide at least one field.")
                .await?;
            return Ok(());
        }

        let emp = roster::find_employee(db, &employee).await?;
        let updated = roster::update_employee(db, emp.id, update).await?;

        ctx.say(format!("✅ Updated **{}**.", updated.name)).await?;
        Ok(())
    }

    /// Adds a monthly allowance line to an employee.
    #[poise::command(slash_command, rename = "allowance")]
    pub async fn employee_allowance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "Label (e.g. House rent)"] label: String,
        #[description = "Monthly amount"] amount: f64,
    ) -> Result<()> {
        add_component(ctx, &employee, ComponentKind::Allowance, &label, amount).await
    }

    /// Adds a monthly deduction line to an employee.
    #[poise::command(slash_command, rename = "deduction")]
    pub async fn employee_deduction(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "Label (e.g. Provident fund)"] label: String,
        #[description = "Monthly amount"] amount: f64,
    ) -> Result<()> {
        add_component(ctx, &employee, ComponentKind::Deduction, &label, amount).await
    }

    async fn add_component(
        ctx: poise::Context<'_, BotData, Error>,
        employee: &str,
        kind: ComponentKind,
        label: &str,
        amount: f64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let emp = roster::find_employee(db, employee).await?;
        let updated = roster::add_pay_component(db, emp.id, kind, label, amount).await?;

        let total = match kind {
            ComponentKind::Allowance => updated.total_allowances(),
            ComponentKind::Deduction => updated.total_deductions(),
        };
        ctx.say(format!(
            "✅ Added {} '{}' of {} to **{}**. Monthly total is now {}.",
            kind.label(),
            label.trim(),
            format_money(amount),
            updated.name,
            format_money(total)
        ))
        .await?;
        Ok(())
    }

    /// Removes an allowance or deduction line from an employee.
    #[poise::command(slash_command, rename = "remove_component")]
    pub async fn employee_remove_component(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "Allowance or deduction"] kind: ComponentChoice,
        #[description = "Label of the line to remove"] label: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let kind = ComponentKind::from(kind);
        let emp = roster::find_employee(db, &employee).await?;
        let updated = roster::remove_pay_component(db, emp.id, kind, &label).await?;

        ctx.say(format!(
            "🗑️ Removed {} '{}' from **{}**.",
            kind.label(),
            label.trim(),
            updated.name
        ))
        .await?;
        Ok(())
    }

    /// Removes an employee, their payslips and the overtime they worked.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn employee_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name or code"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "Type the employee code again to confirm"] confirm_code: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let emp = roster::find_employee(db, &employee).await?;

        if confirm_code.trim() != emp.employee_code {
            ctx.say(format!(
                "❌ Confirmation code does not match `{}`. Nothing was deleted.",
                emp.employee_code
            ))
            .await?;
            return Ok(());
        }

        let removed = roster::delete_employee(db, emp.id).await?;
        ctx.say(format!(
            "🗑️ Removed **{}** ({}) with their payslips and overtime records.",
            removed.name, removed.employee_code
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
