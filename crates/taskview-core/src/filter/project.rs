//! Project filtering. No scoring and no quota.

use crate::criteria::FilterCriteria;
use crate::record::ProjectRecord;

/// Hide done and dropped projects when completed items are hidden.
pub fn keep_project(project: &ProjectRecord, criteria: &FilterCriteria) -> bool {
    !(criteria.hide_completed && project.status.is_closed())
}

/// Filter projects, preserving provider order.
pub fn filter_projects<I>(projects: I, criteria: &FilterCriteria) -> Vec<ProjectRecord>
where
    I: IntoIterator<Item = ProjectRecord>,
{
    projects
        .into_iter()
        .filter(|project| keep_project(project, criteria))
        .collect()
}
