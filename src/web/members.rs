use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use super::render::{error_banner, escape, page, page_with_status, PageResult};
use crate::errors::ServiceError;
use crate::models::Address;
use crate::repositories::NewMember;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zipcode: String,
}

impl MemberForm {
    fn address(&self) -> Option<Address> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.city) && blank(&self.street) && blank(&self.zipcode) {
            return None;
        }
        Some(Address::new(
            self.city.trim(),
            self.street.trim(),
            self.zipcode.trim(),
        ))
    }
}

fn form_body(form: &MemberForm, message: Option<&str>) -> String {
    format!(
        "<h1>Register member</h1>\n{banner}<form method=\"post\" action=\"/members/new\">\n\
         <label>Name <input name=\"name\" value=\"{name}\"></label>\n\
         <label>City <input name=\"city\" value=\"{city}\"></label>\n\
         <label>Street <input name=\"street\" value=\"{street}\"></label>\n\
         <label>Zipcode <input name=\"zipcode\" value=\"{zipcode}\"></label>\n\
         <button type=\"submit\">Submit</button>\n</form>",
        banner = error_banner(message),
        name = escape(&form.name),
        city = escape(&form.city),
        street = escape(&form.street),
        zipcode = escape(&form.zipcode),
    )
}

pub async fn create_form() -> Html<String> {
    page("Register member", &form_body(&MemberForm::default(), None))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<MemberForm>) -> PageResult {
    if form.name.trim().is_empty() {
        return Ok(page_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Register member",
            &form_body(&form, Some("Member name is required")),
        ));
    }

    let member = NewMember::new(form.name.trim(), form.address());
    match state.services.members.join(member).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(ServiceError::DuplicateMember(_)) => Ok(page_with_status(
            StatusCode::CONFLICT,
            "Register member",
            &form_body(&form, Some("Member name is already registered")),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let members = state.services.members.find_members().await?;

    let rows: String = members
        .iter()
        .map(|m| {
            let address = m.address().unwrap_or_default();
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                m.id,
                escape(&m.name),
                escape(&address.city),
                escape(&address.street),
                escape(&address.zipcode)
            )
        })
        .collect();

    Ok(page(
        "Members",
        &format!(
            "<h1>Members</h1>\n<table>\n<thead><tr><th>#</th><th>Name</th><th>City</th>\
             <th>Street</th><th>Zipcode</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_address_fields_mean_no_address() {
        let form = MemberForm {
            name: "kim".into(),
            city: " ".into(),
            ..Default::default()
        };
        assert_eq!(form.address(), None);
    }

    #[test]
    fn form_body_keeps_entered_values_escaped() {
        let form = MemberForm {
            name: "<kim>".into(),
            ..Default::default()
        };
        let html = form_body(&form, Some("oops"));
        assert!(html.contains("value=\"&lt;kim&gt;\""));
        assert!(html.contains("oops"));
    }
}
