use async_trait::async_trait;
use coachsync_core::{
    errors::CoachResult,
    models::{
        person::{NewPerson, Person},
        slot::{Feedback, NewSlot, Slot, SlotFilter},
    },
    store::SlotStore,
};
use mockall::mock;

// Mock store for testing failure paths
mock! {
    pub Store {}

    #[async_trait]
    impl SlotStore for Store {
        async fn list_persons(&self) -> CoachResult<Vec<Person>>;

        async fn get_persons(&self, ids: &[i32]) -> CoachResult<Vec<Person>>;

        async fn create_person(&self, person: NewPerson) -> CoachResult<Person>;

        async fn create_slot(&self, slot: NewSlot) -> CoachResult<Slot>;

        async fn get_slot(&self, id: i32) -> CoachResult<Option<Slot>>;

        async fn find_slots(&self, filter: &SlotFilter) -> CoachResult<Vec<Slot>>;

        async fn find_conflicts(
            &self,
            coach_id: Option<i32>,
            student_id: i32,
        ) -> CoachResult<Vec<Slot>>;

        async fn book_slot(&self, id: i32, student_id: i32) -> CoachResult<Option<Slot>>;

        async fn record_feedback(&self, id: i32, feedback: Feedback) -> CoachResult<Option<Slot>>;
    }
}
