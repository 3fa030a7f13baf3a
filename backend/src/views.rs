// src/views.rs
//
// Server-rendered pages. Everything is built from `Entity` descriptors so
// contacts and leads share one set of templates.

use std::fmt::Write;

use crate::auth::AuthContext;
use crate::entities::{Entity, FormData, ValidationErrors};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn navbar(auth: &AuthContext) -> String {
    let account = match &auth.user {
        Some(user) => format!(
            r#"<span class="navbar-text">{}</span><a class="nav-link" href="/auth/logout">Log Out</a>"#,
            escape(&user.username)
        ),
        None => r#"<a class="nav-link" href="/auth/register">Register</a><a class="nav-link" href="/auth/login">Log In</a>"#
            .to_string(),
    };

    format!(
        r#"<nav class="navbar"><a class="navbar-brand" href="/">Flaskr</a><div class="navbar-nav"><a class="nav-link" href="/contact/">Contacts</a><a class="nav-link" href="/lead/">Leads</a></div><div class="navbar-account">{}</div></nav>"#,
        account
    )
}

pub fn layout(title: &str, auth: &AuthContext, body: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title} - Flaskr</title></head>\n<body>{nav}<main class=\"container\">{body}</main></body></html>\n",
        title = escape(title),
        nav = navbar(auth),
        body = body,
    )
}

fn error_block(errors: Option<&ValidationErrors>) -> String {
    match errors {
        Some(errors) if !errors.is_empty() => {
            format!(r#"<div class="flash">{}</div>"#, escape(&errors.to_string()))
        }
        _ => String::new(),
    }
}

fn delete_button(action: &str) -> String {
    format!(
        r#"<form class="inline" action="{}" method="post"><button type="submit" class="btn btn-danger" onclick="return confirm('Are you sure?');">Delete</button></form>"#,
        escape(action)
    )
}

pub fn home(auth: &AuthContext) -> String {
    let body = r#"<h1>Flaskr</h1><ul><li><a href="/contact/">Contacts</a></li><li><a href="/lead/">Leads</a></li></ul>"#;
    layout("Home", auth, body)
}

pub fn entity_index<E: Entity>(rows: &[E::Row], auth: &AuthContext) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1>{}</h1><a class="btn btn-primary" href="{}/create">{}</a>"#,
        E::PLURAL,
        E::PATH,
        E::NEW_LINK
    );

    if rows.is_empty() {
        let _ = write!(body, "<p>{}</p>", E::EMPTY_TEXT);
        return layout(E::PLURAL, auth, &body);
    }

    body.push_str("<table class=\"table\"><thead><tr>");
    for field in E::FIELDS {
        let _ = write!(body, "<th>{}</th>", field.label);
    }
    for (_, label) in E::extra_columns() {
        let _ = write!(body, "<th>{}</th>", label);
    }
    body.push_str("<th></th></tr></thead><tbody>");

    for row in rows {
        let id = E::id(row);
        body.push_str("<tr>");
        for field in E::FIELDS {
            let _ = write!(body, "<td>{}</td>", escape(&E::cell(row, field.name)));
        }
        for (name, _) in E::extra_columns() {
            let _ = write!(body, "<td>{}</td>", escape(&E::cell(row, name)));
        }
        let _ = write!(
            body,
            r#"<td><a class="btn" href="{path}/{id}/update">Edit</a>{delete}</td></tr>"#,
            path = E::PATH,
            id = id,
            delete = delete_button(&format!("{}/{}/delete", E::PATH, id)),
        );
    }
    body.push_str("</tbody></table>");

    layout(E::PLURAL, auth, &body)
}

/// Create form when `id` is `None`, edit form otherwise.
pub fn entity_form<E: Entity>(
    id: Option<i64>,
    values: &FormData,
    errors: Option<&ValidationErrors>,
    auth: &AuthContext,
) -> String {
    let title = match id {
        Some(_) => format!("Edit {}", E::LABEL),
        None => format!("New {}", E::LABEL),
    };
    let action = match id {
        Some(id) => format!("{}/{}/update", E::PATH, id),
        None => format!("{}/create", E::PATH),
    };

    let mut body = String::new();
    let _ = write!(body, "<h1>{}</h1>{}", escape(&title), error_block(errors));
    let _ = write!(body, r#"<form method="post" action="{}">"#, escape(&action));
    for field in E::FIELDS {
        let _ = write!(
            body,
            r#"<label for="{name}">{label}</label><input type="{kind}" name="{name}" id="{name}" value="{value}"{required}>"#,
            name = field.name,
            label = field.label,
            kind = field.input.html_type(),
            value = escape(values.get(field.name)),
            required = if field.required { " required" } else { "" },
        );
    }
    body.push_str(r#"<button type="submit" class="btn btn-primary">Save</button></form>"#);

    if let Some(id) = id {
        body.push_str(&delete_button(&format!("{}/{}/delete", E::PATH, id)));
    }

    layout(&title, auth, &body)
}

/// Register and login share one form.
pub fn auth_form(title: &str, action: &str, error: Option<&str>, username: &str, auth: &AuthContext) -> String {
    let mut body = String::new();
    let _ = write!(body, "<h1>{}</h1>", escape(title));
    if let Some(error) = error {
        let _ = write!(body, r#"<div class="flash">{}</div>"#, escape(error));
    }
    let _ = write!(
        body,
        r#"<form method="post" action="{action}"><label for="username">Username</label><input name="username" id="username" value="{username}" required><label for="password">Password</label><input type="password" name="password" id="password" required><input type="submit" value="{title}"></form>"#,
        action = escape(action),
        username = escape(username),
        title = escape(title),
    );

    layout(title, auth, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Lead;
    use crate::entities::LeadEntity;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_index() {
        let page = entity_index::<LeadEntity>(&[], &AuthContext::anonymous());
        assert!(page.contains("<h1>Leads</h1>"));
        assert!(page.contains("No leads found."));
        assert!(page.contains("Add Lead"));
    }

    #[test]
    fn test_index_row_cells_in_field_order() {
        let rows = vec![Lead {
            id: 4,
            title: "E2E Test Lead".into(),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            amount: Some(1000.5),
            probability: Some(0.75),
        }];

        let page = entity_index::<LeadEntity>(&rows, &AuthContext::anonymous());

        assert!(page.contains(
            "<td>E2E Test Lead</td><td>2024-01-01</td><td>2024-01-31</td><td>1000.5</td><td>0.75</td>"
        ));
        assert!(page.contains(r#"href="/lead/4/update""#));
        assert!(page.contains(r#"action="/lead/4/delete""#));
    }

    #[test]
    fn test_form_shows_errors_and_values() {
        let values: FormData = [("title", "<script>"), ("amount", "abc")].into_iter().collect();
        let mut errors = ValidationErrors::new();
        errors.push("Invalid amount.");

        let page = entity_form::<LeadEntity>(Some(9), &values, Some(&errors), &AuthContext::anonymous());

        assert!(page.contains("<h1>Edit Lead</h1>"));
        assert!(page.contains("Invalid amount."));
        assert!(page.contains(r#"value="&lt;script&gt;""#));
        assert!(page.contains(r#"action="/lead/9/update""#));
    }
}
