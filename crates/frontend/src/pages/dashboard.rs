use chrono::NaiveDate;
use shared_types::{FoodRecord, FoodRecordQuery, MonthKey};
use std::rc::Rc;
use yew::prelude::*;

use crate::calendar::{records_for_date, today};
use crate::components::{CalendarView, Header, RecordList, RecordModal};
use crate::services::ApiService;

#[derive(Debug, Clone, PartialEq)]
enum ModalState {
    Closed,
    Adding,
    Editing(FoodRecord),
}

/// Generation counter. Each dispatch moves past the latest value, so
/// several changes finishing in one render still refetch.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Refresh(u32);

impl Reducible for Refresh {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Refresh(self.0.wrapping_add(1)))
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let today = today();
    let month = use_state(|| MonthKey::of(today));
    let selected = use_state(|| today);
    let records = use_state(Vec::<FoodRecord>::new);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let modal = use_state(|| ModalState::Closed);
    // Bumped to refetch the current month after a change.
    let refresh = use_reducer(Refresh::default);

    {
        let records = records.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with((*month, refresh.0), move |(month, _)| {
            let query = FoodRecordQuery::for_month(*month);
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::list_records(&query).await {
                    Ok(list) => records.set(list),
                    Err(e) => {
                        tracing::error!("Failed to load food records: {}", e);
                        error.set(Some(format!("Failed to load food records: {}", e)));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let bump = {
        let refresh = refresh.clone();
        move || refresh.dispatch(())
    };

    let on_prev = {
        let month = month.clone();
        Callback::from(move |_| month.set(month.prev()))
    };

    let on_next = {
        let month = month.clone();
        Callback::from(move |_| month.set(month.next()))
    };

    let on_select = {
        let month = month.clone();
        let selected = selected.clone();
        let modal = modal.clone();
        Callback::from(move |date: NaiveDate| {
            selected.set(date);
            if !month.contains(date) {
                month.set(MonthKey::of(date));
            }
            modal.set(ModalState::Closed);
        })
    };

    let on_add = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(ModalState::Adding))
    };

    let on_edit = {
        let modal = modal.clone();
        Callback::from(move |record: FoodRecord| modal.set(ModalState::Editing(record)))
    };

    let on_delete = {
        let error = error.clone();
        let bump = bump.clone();
        Callback::from(move |record: FoodRecord| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this record?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let error = error.clone();
            let bump = bump.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::delete_record(record.id).await {
                    Ok(()) => bump(),
                    Err(e) => {
                        tracing::error!("Failed to delete record {}: {}", record.id, e);
                        error.set(Some(format!("Failed to delete record: {}", e)));
                    }
                }
            });
        })
    };

    let on_close_modal = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(ModalState::Closed))
    };

    // Jump to the saved record's day so the change is visible.
    let on_saved = {
        let month = month.clone();
        let selected = selected.clone();
        let bump = bump.clone();
        Callback::from(move |record: FoodRecord| {
            selected.set(record.date);
            month.set(MonthKey::of(record.date));
            bump();
        })
    };

    let dismiss_error = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let day_records = records_for_date(&records, *selected);

    html! {
        <div class="dashboard">
            <Header />

            <div class="dashboard-content">
                <CalendarView
                    month={*month}
                    today={today}
                    selected={*selected}
                    records={(*records).clone()}
                    {on_prev}
                    {on_next}
                    {on_select}
                />
                <RecordList
                    date={*selected}
                    records={day_records}
                    loading={*loading}
                    {on_add}
                    {on_edit}
                    {on_delete}
                />
            </div>

            {match &*modal {
                ModalState::Closed => html! {},
                ModalState::Adding => html! {
                    <RecordModal
                        default_date={*selected}
                        on_close={on_close_modal.clone()}
                        on_saved={on_saved.clone()}
                    />
                },
                ModalState::Editing(record) => html! {
                    <RecordModal
                        key={record.id.to_string()}
                        record={Some(record.clone())}
                        default_date={*selected}
                        on_close={on_close_modal.clone()}
                        on_saved={on_saved.clone()}
                    />
                },
            }}

            {if let Some(err) = &*error {
                html! {
                    <div class="error-toast">
                        {err}
                        <button onclick={dismiss_error}>{"×"}</button>
                    </div>
                }
            } else {
                html! {}
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_counts_from_latest_value() {
        let first = Rc::new(Refresh::default()).reduce(());
        let second = first.clone().reduce(());
        assert_eq!(*first, Refresh(1));
        assert_eq!(*second, Refresh(2));
    }

    #[test]
    fn test_refresh_wraps() {
        assert_eq!(*Rc::new(Refresh(u32::MAX)).reduce(()), Refresh(0));
    }
}
