use contracts::system::users::{validate_user, SystemProgram, UserRecord};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal_frame::ModalFrame;
use crate::shared::notifications::use_notifications;
use crate::system::users::api;

/// Comma separated input to a trimmed list without blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn has_permission(selected: &[SystemProgram], program: &str, permission: &str) -> bool {
    selected
        .iter()
        .any(|p| p.name == program && p.permissions.iter().any(|x| x == permission))
}

/// Adds or removes one permission; programs left without permissions are dropped.
fn toggle_permission(selected: &mut Vec<SystemProgram>, program: &str, permission: &str) {
    match selected.iter_mut().find(|p| p.name == program) {
        Some(entry) => {
            if let Some(pos) = entry.permissions.iter().position(|x| x == permission) {
                entry.permissions.remove(pos);
            } else {
                entry.permissions.push(permission.to_string());
            }
        }
        None => selected.push(SystemProgram {
            name: program.to_string(),
            permissions: vec![permission.to_string()],
        }),
    }
    selected.retain(|p| !p.permissions.is_empty());
}

#[component]
fn TextField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] disabled: bool,
    #[prop(optional)] password: bool,
) -> impl IntoView {
    let input_type = if password {
        InputType::Password
    } else {
        InputType::Text
    };
    view! {
        <div class="form__group">
            <Label>{label}</Label>
            <Input value=value input_type=input_type disabled=disabled />
        </div>
    }
}

/// Add / Edit form. `user = None` creates a new record.
#[component]
pub fn UserFormModal(
    user: Option<UserRecord>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let notifications = use_notifications();
    let is_new = user.is_none();
    let base = user.unwrap_or_default();
    let text = |v: &Option<String>| RwSignal::new(v.clone().unwrap_or_default());

    let emp_no = RwSignal::new(base.emp_no.clone());
    let emp_name = RwSignal::new(base.emp_name.clone());
    let emp_rank = text(&base.emp_rank);
    let class_name = text(&base.class_name);
    let station_name = text(&base.station_name);
    let emp_pass = text(&base.emp_pass);
    let emp_bc = text(&base.emp_bc);
    let emp_pwd_pass = text(&base.emp_pwd_pass);
    let email = text(&base.email);
    let dept_name = text(&base.dept_name);
    let owner = text(&base.owner);
    let quit_date = text(&base.quit_date);
    let roles = RwSignal::new(base.roles.join(", "));
    let stations = RwSignal::new(base.stations.join(", "));
    let selected_programs = RwSignal::new(base.system_programs.clone());

    let catalog: RwSignal<Vec<SystemProgram>> = RwSignal::new(Vec::new());
    let errors: RwSignal<Vec<String>> = RwSignal::new(Vec::new());
    let (saving, set_saving) = signal(false);

    spawn_local(async move {
        match api::fetch_system_programs().await {
            Ok(programs) => catalog.set(programs),
            Err(e) => notifications.error(e),
        }
    });

    let collect = move || UserRecord {
        emp_no: emp_no.get_untracked().trim().to_string(),
        emp_name: emp_name.get_untracked().trim().to_string(),
        emp_rank: optional(emp_rank.get_untracked()),
        class_name: optional(class_name.get_untracked()),
        station_name: optional(station_name.get_untracked()),
        emp_pass: optional(emp_pass.get_untracked()),
        emp_bc: optional(emp_bc.get_untracked()),
        emp_pwd_pass: optional(emp_pwd_pass.get_untracked()),
        email: optional(email.get_untracked()),
        dept_name: optional(dept_name.get_untracked()),
        owner: optional(owner.get_untracked()),
        quit_date: optional(quit_date.get_untracked()),
        roles: split_list(&roles.get_untracked()),
        system_programs: selected_programs.get_untracked(),
        stations: split_list(&stations.get_untracked()),
    };

    let on_save = move |_| {
        let record = collect();
        if let Err(problems) = validate_user(&record) {
            errors.set(problems);
            return;
        }
        errors.set(Vec::new());
        set_saving.set(true);
        spawn_local(async move {
            let result = if is_new {
                api::create_user(&record).await
            } else {
                api::update_user(&record).await
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    notifications.success(format!("User {} saved", saved.emp_no));
                    on_saved.run(());
                }
                Err(e) => notifications.error(e),
            }
        });
    };

    let title = if is_new {
        "Add User".to_string()
    } else {
        format!("Edit User: {}", base.emp_no)
    };

    view! {
        <ModalFrame title=title on_close=on_close modal_class="modal--wide">
            <div class="modal-body">
                <Show when=move || errors.with(|e| !e.is_empty())>
                    <div class="alert alert--error">
                        <ul>
                            {move || errors.get().into_iter().map(|e| view! { <li>{e}</li> }).collect_view()}
                        </ul>
                    </div>
                </Show>

                <div class="form__grid">
                    <TextField label="Emp No" value=emp_no disabled=!is_new />
                    <TextField label="Emp Name" value=emp_name />
                    <TextField label="Emp Rank" value=emp_rank />
                    <TextField label="Class Name" value=class_name />
                    <TextField label="Station Name" value=station_name />
                    <TextField label="Dept Name" value=dept_name />
                    <TextField label="Emp Pass" value=emp_pass password=true />
                    <TextField label="Emp BC" value=emp_bc password=true />
                    <TextField label="Emp Pwd Pass" value=emp_pwd_pass password=true />
                    <TextField label="Email" value=email />
                    <TextField label="Owner" value=owner />
                    <TextField label="Quit Date" value=quit_date />
                    <TextField label="Roles (comma separated)" value=roles />
                    <TextField label="Stations (comma separated)" value=stations />
                </div>

                <h3 class="form__section-title">"System Programs"</h3>
                <div class="form__programs">
                    {move || catalog.get().into_iter().map(|program| {
                        let name = StoredValue::new(program.name.clone());
                        view! {
                            <div class="form__program">
                                <span class="form__program-name">{program.name.clone()}</span>
                                {program.permissions.into_iter().map(|permission| {
                                    let perm = StoredValue::new(permission.clone());
                                    view! {
                                        <label class="form__permission">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selected_programs.with(|s| {
                                                    has_permission(s, &name.get_value(), &perm.get_value())
                                                })
                                                on:change=move |_| selected_programs.update(|s| {
                                                    toggle_permission(s, &name.get_value(), &perm.get_value())
                                                })
                                            />
                                            {permission}
                                        </label>
                                    }
                                }).collect_view()}
                            </div>
                        }
                    }).collect_view()}
                </div>
            </div>

            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_close.run(())
                    disabled=Signal::derive(move || saving.get())
                >
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" ADMIN, ,OPERATOR ,"),
            vec!["ADMIN".to_string(), "OPERATOR".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_toggle_permission() {
        let mut selected = Vec::new();
        toggle_permission(&mut selected, "AMBIT_WIP", "VIEW");
        toggle_permission(&mut selected, "AMBIT_WIP", "EXPORT");
        assert!(has_permission(&selected, "AMBIT_WIP", "VIEW"));
        assert_eq!(selected[0].permissions.len(), 2);

        toggle_permission(&mut selected, "AMBIT_WIP", "VIEW");
        toggle_permission(&mut selected, "AMBIT_WIP", "EXPORT");
        assert!(selected.is_empty());
    }

    #[test]
    fn test_optional_trims() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional(" PD ".to_string()), Some("PD".to_string()));
    }
}
