//! [`Database`] implementations of the [`Memory`] database.

use std::{cmp::Reverse, ops::RangeInclusive};

use common::{
    operations::{By, Delete, Insert, Select, Update},
    unit::All,
    Date, Period,
};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        notification, property, sale, Achievement, Goal, Notification,
        Property, Sale,
    },
    infra::{database, Database},
};

use super::{Memory, Table};

impl Database<Select<By<Option<Property>, property::Id>>> for Memory {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Properties)?;

        Ok(state.properties.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Property>, All>>> for Memory {
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Property>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Properties)?;

        Ok(state
            .properties
            .values()
            .sorted_by_key(|p| (p.created_at, p.id))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Property>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Properties)?;

        _ = state.properties.insert(property.id, property);
        Ok(())
    }
}

impl Database<Update<Property>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Delete<By<Property, property::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Properties)?;

        Ok(state.properties.remove(&by.into_inner()).is_some())
    }
}

impl Database<Select<By<Option<Sale>, sale::Id>>> for Memory {
    type Ok = Option<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sale>, sale::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Sales)?;

        Ok(state.sales.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Sale>, All>>> for Memory {
    type Ok = Vec<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Sale>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Sales)?;

        Ok(state
            .sales
            .values()
            .sorted_by_key(|s| (Reverse((s.date, s.created_at)), s.id))
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<Sale>, RangeInclusive<Date>>>> for Memory {
    type Ok = Vec<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Sale>, RangeInclusive<Date>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let range = by.into_inner();

        let state = self.0.read().await;
        state.check(Table::Sales)?;

        Ok(state
            .sales
            .values()
            .filter(|s| range.contains(&s.date))
            .sorted_by_key(|s| (Reverse((s.date, s.created_at)), s.id))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Sale>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(sale): Insert<Sale>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Sales)?;

        _ = state.sales.insert(sale.id, sale);
        Ok(())
    }
}

impl Database<Update<Sale>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(sale): Update<Sale>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(sale)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Delete<By<Sale, sale::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Sale, sale::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Sales)?;

        Ok(state.sales.remove(&by.into_inner()).is_some())
    }
}

impl Database<Select<By<Option<Goal>, Period>>> for Memory {
    type Ok = Option<Goal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Goal>, Period>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Goals)?;

        Ok(state.goals.get(&by.into_inner()).copied())
    }
}

impl Database<Select<By<Vec<Goal>, All>>> for Memory {
    type Ok = Vec<Goal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Goal>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Goals)?;

        Ok(state
            .goals
            .values()
            .copied()
            .sorted_by_key(|g| g.period)
            .collect())
    }
}

impl Database<Insert<Goal>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(goal): Insert<Goal>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Goals)?;

        _ = state.goals.insert(goal.period, goal);
        Ok(())
    }
}

impl Database<Select<By<Vec<Achievement>, All>>> for Memory {
    type Ok = Vec<Achievement>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Achievement>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Achievements)?;

        Ok(state
            .achievements
            .values()
            .sorted_by_key(|a| (a.unlocked_at, a.key))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Achievement>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(achievement): Insert<Achievement>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Achievements)?;

        if state.achievements.contains_key(&achievement.key) {
            return Ok(false);
        }
        _ = state.achievements.insert(achievement.key, achievement);
        Ok(true)
    }
}

impl Database<Select<By<Option<Notification>, notification::Id>>> for Memory {
    type Ok = Option<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Notification>, notification::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Notifications)?;

        Ok(state.notifications.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Notification>, All>>> for Memory {
    type Ok = Vec<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Notification>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        state.check(Table::Notifications)?;

        Ok(state
            .notifications
            .values()
            .sorted_by_key(|n| (Reverse(n.created_at), n.due_on, n.id))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Notification>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(notification): Insert<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Notifications)?;

        let subject = notification.subject();
        if state.notifications.values().any(|n| n.subject() == subject) {
            return Ok(false);
        }
        _ = state.notifications.insert(notification.id, notification);
        Ok(true)
    }
}

impl Database<Update<Notification>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(notification): Update<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Notifications)?;

        _ = state.notifications.insert(notification.id, notification);
        Ok(())
    }
}

impl Database<Delete<By<Notification, All>>> for Memory {
    type Ok = usize;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Delete<By<Notification, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        state.check_write(Table::Notifications)?;

        Ok(state.notifications.drain().count())
    }
}
