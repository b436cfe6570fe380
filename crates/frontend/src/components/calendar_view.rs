use chrono::{Datelike, NaiveDate};
use shared_types::{FoodRecord, MonthKey};
use yew::prelude::*;

use crate::calendar::{month_title, CalendarDay, MonthGrid, WEEKDAY_LABELS};

#[derive(Properties, PartialEq, Clone)]
pub struct CalendarViewProps {
    pub month: MonthKey,
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub records: Vec<FoodRecord>,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
    pub on_select: Callback<NaiveDate>,
}

fn day_classes(day: &CalendarDay) -> Classes {
    classes!(
        "calendar-day",
        (!day.in_current_month).then_some("other-month"),
        day.is_today.then_some("today"),
        day.is_selected.then_some("selected"),
    )
}

fn render_day(day: &CalendarDay, on_select: &Callback<NaiveDate>) -> Html {
    let date = day.date;
    let onclick = {
        let on_select = on_select.clone();
        Callback::from(move |_| on_select.emit(date))
    };

    html! {
        <div key={date.to_string()} class={day_classes(day)} {onclick}>
            <span class="day-number">{date.day()}</span>
            {if day.records.is_empty() {
                html! {}
            } else {
                html! {
                    <div class="day-indicators">
                        {for day.indicators().iter().map(|record| html! {
                            <span
                                key={record.id.to_string()}
                                class="meal-indicator"
                                style={format!("background-color: {}", record.meal_type.color())}
                                title={format!("{}: {}", record.meal_type.label(), record.food_items)}
                            />
                        })}
                        {if day.overflow() > 0 {
                            html! { <span class="more-indicator">{format!("+{}", day.overflow())}</span> }
                        } else {
                            html! {}
                        }}
                    </div>
                }
            }}
        </div>
    }
}

#[function_component(CalendarView)]
pub fn calendar_view(props: &CalendarViewProps) -> Html {
    let grid = MonthGrid::build(props.month, props.today, props.selected, &props.records);

    let on_prev = {
        let cb = props.on_prev.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_next = {
        let cb = props.on_next.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div class="calendar-section">
            <div class="calendar-header">
                <button class="nav-btn" onclick={on_prev} aria-label="Previous month">{"‹"}</button>
                <h2>{month_title(props.month)}</h2>
                <button class="nav-btn" onclick={on_next} aria-label="Next month">{"›"}</button>
            </div>

            <div class="calendar">
                <div class="calendar-weekdays">
                    {for WEEKDAY_LABELS.iter().map(|label| html! {
                        <div key={*label} class="weekday">{*label}</div>
                    })}
                </div>
                <div class="calendar-days">
                    {for grid.weeks.iter().enumerate().map(|(i, week)| html! {
                        <div key={i} class="calendar-week">
                            {for week.iter().map(|day| render_day(day, &props.on_select))}
                        </div>
                    })}
                </div>
            </div>
        </div>
    }
}
