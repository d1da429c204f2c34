//! Binding `key=value` pairs onto page forms

use kati_core::schedule::{ReportType, ScheduleForm};
use kati_core::settings::ApiSettings;

use super::args::parse_bool;
use super::error::{ShellError, ShellResult};
use crate::pages::{CompanyForm, LoginPage, ReportForm, UserForm};

type Fields = [(String, String)];

fn unknown(key: &str) -> ShellError {
    ShellError::UnknownField(key.to_string())
}

pub fn apply_company(form: &mut CompanyForm, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "name" => form.name = value.clone(),
            "api_key" => form.api_key = value.clone(),
            "api_url" => form.api_url = value.clone(),
            "description" => form.description = value.clone(),
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

pub fn apply_user(form: &mut UserForm, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "name" => form.name = value.clone(),
            "email" => form.email = value.clone(),
            "role" => form.role = value.clone(),
            "receive_reports" => form.receive_reports = parse_bool(value)?,
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

pub fn apply_schedule(form: &mut ScheduleForm, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "name" => form.name = value.clone(),
            "description" => form.description = value.clone(),
            "type" | "report_type" => form.select_type(value.parse::<ReportType>()?),
            "cron" | "cron_expression" => form.cron_expression = value.clone(),
            "date_start" => form.date_start = value.clone(),
            "date_end" => form.date_end = value.clone(),
            "recipients" => form.recipients = value.clone(),
            "is_active" | "active" => form.is_active = parse_bool(value)?,
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

pub fn apply_report(form: &mut ReportForm, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "date_start" => form.date_start = value.clone(),
            "date_end" => form.date_end = value.clone(),
            "email_to" | "recipients" => form.email_to = value.clone(),
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

pub fn apply_settings(settings: &mut ApiSettings, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "api_url" | "url" => settings.api_url = value.clone(),
            "bearer_token" | "token" => settings.bearer_token = value.clone(),
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

pub fn apply_login(page: &mut LoginPage, fields: &Fields) -> ShellResult<()> {
    for (key, value) in fields {
        match key.as_str() {
            "email" => page.email = value.clone(),
            "password" => page.password = value.clone(),
            other => return Err(unknown(other)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_schedule_fields() {
        let mut form = ScheduleForm::new();
        apply_schedule(
            &mut form,
            &fields(&[("name", "Nightly"), ("type", "custom"), ("cron", "0 2 * * *"), ("active", "no")]),
        )
        .unwrap();

        assert_eq!(form.report_type(), ReportType::Custom);
        assert_eq!(form.cron_expression, "0 2 * * *");
        assert!(!form.is_active);
    }

    #[test]
    fn test_bad_values_are_reported() {
        let mut form = ScheduleForm::new();
        assert!(matches!(
            apply_schedule(&mut form, &fields(&[("type", "hourly")])),
            Err(ShellError::Core(_))
        ));

        let mut user = UserForm::default();
        assert!(matches!(
            apply_user(&mut user, &fields(&[("receive_reports", "sometimes")])),
            Err(ShellError::InvalidBool(_))
        ));
        assert!(matches!(
            apply_user(&mut user, &fields(&[("phone", "123")])),
            Err(ShellError::UnknownField(_))
        ));
    }

    #[test]
    fn test_company_fields() {
        let mut form = CompanyForm::default();
        apply_company(&mut form, &fields(&[("name", "Acme"), ("description", "")])).unwrap();
        assert_eq!(form.name, "Acme");
        assert_eq!(form.description, "");
    }
}
