use diesel::prelude::*;

use crate::domain::schedule::ScheduleConfig;
use crate::models::schedule::{SCHEDULE_CONFIG_ID, ScheduleConfig as DbScheduleConfig};
use crate::repository::{DieselRepository, RepositoryResult, ScheduleReader, ScheduleWriter};

impl ScheduleReader for DieselRepository {
    fn get_schedule_config(&self) -> RepositoryResult<Option<ScheduleConfig>> {
        use crate::schema::schedule_config;

        let mut conn = self.conn()?;

        let result = schedule_config::table
            .find(SCHEDULE_CONFIG_ID)
            .select(DbScheduleConfig::as_select())
            .first::<DbScheduleConfig>(&mut conn)
            .optional()?;

        let result = result.map(TryInto::try_into).transpose()?;
        Ok(result)
    }
}

impl ScheduleWriter for DieselRepository {
    fn update_schedule_config(&self, config: &ScheduleConfig) -> RepositoryResult<usize> {
        use crate::schema::schedule_config;

        let mut conn = self.conn()?;

        let affected = diesel::replace_into(schedule_config::table)
            .values(&DbScheduleConfig::from(config))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
