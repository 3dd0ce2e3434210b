mod capital;
mod checklist;
mod lifecycle;
mod persistence;
