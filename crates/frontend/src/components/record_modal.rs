use chrono::NaiveDate;
use shared_types::{FoodRecord, FoodRecordRequest, MealType};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::forms::validate_record;
use crate::services::ApiService;

#[derive(Properties, PartialEq, Clone)]
pub struct RecordModalProps {
    /// Record being edited; `None` creates a new one.
    #[prop_or_default]
    pub record: Option<FoodRecord>,
    /// Date pre-filled when creating.
    pub default_date: NaiveDate,
    pub on_close: Callback<()>,
    pub on_saved: Callback<FoodRecord>,
}

/// Editable form fields. Notes are kept as the raw textarea string.
#[derive(Debug, Clone, PartialEq)]
struct RecordDraft {
    date: String,
    meal_type: MealType,
    food_items: String,
    notes: String,
}

impl RecordDraft {
    fn new(record: Option<&FoodRecord>, default_date: NaiveDate) -> Self {
        match record {
            Some(r) => RecordDraft {
                date: r.date.format("%Y-%m-%d").to_string(),
                meal_type: r.meal_type,
                food_items: r.food_items.clone(),
                notes: r.notes.clone().unwrap_or_default(),
            },
            None => RecordDraft {
                date: default_date.format("%Y-%m-%d").to_string(),
                meal_type: MealType::default(),
                food_items: String::new(),
                notes: String::new(),
            },
        }
    }

    fn to_request(&self) -> Result<FoodRecordRequest, String> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| "Please choose a valid date".to_string())?;
        validate_record(FoodRecordRequest {
            date,
            meal_type: self.meal_type,
            food_items: self.food_items.clone(),
            notes: Some(self.notes.clone()),
        })
    }
}

#[function_component(RecordModal)]
pub fn record_modal(props: &RecordModalProps) -> Html {
    let draft = {
        let record = props.record.clone();
        let default_date = props.default_date;
        use_state(move || RecordDraft::new(record.as_ref(), default_date))
    };
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);

    let editing_id = props.record.as_ref().map(|r| r.id);

    let on_date = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.date = input.value();
            draft.set(next);
        })
    };

    let on_meal = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<MealType>() {
                Ok(meal_type) => {
                    let mut next = (*draft).clone();
                    next.meal_type = meal_type;
                    draft.set(next);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        })
    };

    let on_food = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.food_items = input.value();
            draft.set(next);
        })
    };

    let on_notes = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.notes = input.value();
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();
        let on_saved = props.on_saved.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = match draft.to_request() {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            let saving = saving.clone();
            let error = error.clone();
            let on_saved = on_saved.clone();
            let on_close = on_close.clone();
            saving.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                let result = match editing_id {
                    Some(id) => ApiService::update_record(id, &request).await,
                    None => ApiService::create_record(&request).await,
                };
                match result {
                    Ok(record) => {
                        on_saved.emit(record);
                        on_close.emit(());
                    }
                    Err(e) => {
                        tracing::error!("Failed to save record: {}", e);
                        error.set(Some(e.message));
                        saving.set(false);
                    }
                }
            });
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());

    let busy = *saving;
    let title = if editing_id.is_some() {
        "Edit food record"
    } else {
        "Add food record"
    };

    html! {
        <div class="modal-overlay" onclick={close.clone()}>
            <div class="modal-content" onclick={stop}>
                <div class="modal-header">
                    <h3>{title}</h3>
                    <button type="button" class="close-btn" onclick={close.clone()}>{"×"}</button>
                </div>

                <form class="record-form" onsubmit={on_submit}>
                    {if let Some(err) = &*error {
                        html! { <div class="error-message">{err}</div> }
                    } else {
                        html! {}
                    }}

                    <div class="form-group">
                        <label for="record-date">{"Date"}</label>
                        <input
                            type="date"
                            id="record-date"
                            value={draft.date.clone()}
                            onchange={on_date}
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <div class="form-group">
                        <label for="record-meal">{"Meal"}</label>
                        <select id="record-meal" onchange={on_meal} disabled={busy}>
                            {for MealType::ALL.iter().map(|meal| html! {
                                <option
                                    key={meal.as_str()}
                                    value={meal.as_str()}
                                    selected={*meal == draft.meal_type}
                                >
                                    {meal.label()}
                                </option>
                            })}
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="record-food">{"What did you eat?"}</label>
                        <textarea
                            id="record-food"
                            value={draft.food_items.clone()}
                            oninput={on_food}
                            placeholder="Describe what you ate..."
                            rows="4"
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <div class="form-group">
                        <label for="record-notes">{"Notes (optional)"}</label>
                        <textarea
                            id="record-notes"
                            value={draft.notes.clone()}
                            oninput={on_notes}
                            placeholder="Add a note..."
                            rows="2"
                            disabled={busy}
                        />
                    </div>

                    <div class="form-actions">
                        <button type="button" onclick={close} disabled={busy}>{"Cancel"}</button>
                        <button type="submit" disabled={busy}>
                            {if busy { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
