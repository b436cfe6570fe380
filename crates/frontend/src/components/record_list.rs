use chrono::NaiveDate;
use shared_types::FoodRecord;
use yew::prelude::*;

use crate::calendar::long_date;

#[derive(Properties, PartialEq, Clone)]
pub struct RecordListProps {
    pub date: NaiveDate,
    pub records: Vec<FoodRecord>,
    pub loading: bool,
    pub on_add: Callback<()>,
    pub on_edit: Callback<FoodRecord>,
    pub on_delete: Callback<FoodRecord>,
}

/// Records of the selected day with edit and delete actions.
#[function_component(RecordList)]
pub fn record_list(props: &RecordListProps) -> Html {
    let on_add = {
        let cb = props.on_add.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let body = if props.loading && props.records.is_empty() {
        html! { <p class="loading">{"Loading records..."}</p> }
    } else if props.records.is_empty() {
        html! {
            <div class="empty-state">
                <p>{"No food records for this day yet"}</p>
                <button class="add-first-btn" onclick={on_add.clone()}>{"Add the first record"}</button>
            </div>
        }
    } else {
        html! {
            <>
            {for props.records.iter().map(|record| {
                let on_edit = {
                    let cb = props.on_edit.clone();
                    let record = record.clone();
                    Callback::from(move |_| cb.emit(record.clone()))
                };
                let on_delete = {
                    let cb = props.on_delete.clone();
                    let record = record.clone();
                    Callback::from(move |_| cb.emit(record.clone()))
                };
                let meal = record.meal_type;

                html! {
                    <div key={record.id.to_string()} class="record-item">
                        <div class="record-header">
                            <div class="meal-info">
                                <span class="meal-dot" style={format!("background-color: {}", meal.color())} />
                                <span class="meal-type">{meal.label()}</span>
                            </div>
                            <div class="record-actions">
                                <button class="action-btn edit-btn" onclick={on_edit}>{"Edit"}</button>
                                <button class="action-btn delete-btn" onclick={on_delete}>{"Delete"}</button>
                            </div>
                        </div>
                        <div class="record-content">
                            <p class="food-items">{&record.food_items}</p>
                            {if let Some(notes) = &record.notes {
                                html! { <p class="notes">{notes}</p> }
                            } else {
                                html! {}
                            }}
                        </div>
                    </div>
                }
            })}
            </>
        }
    };

    html! {
        <div class="details-section">
            <div class="details-header">
                <h3>{long_date(props.date)}</h3>
                <button class="add-btn" onclick={on_add}>{"+ Add record"}</button>
            </div>
            <div class="records-list">
                {body}
            </div>
        </div>
    }
}
