use serde::{Deserialize, Serialize};

/// Location of a thunderstorm or convective cloud, e.g. "TS OHD MOV NE" or "CB DSNT W-NW".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThunderstormLocation {
    cloud_type: String,
    location_qualifier: Option<String>,
    direction: Option<String>,
    direction_range: Option<String>,
    moving_direction: Option<String>,
}

impl ThunderstormLocation {
    pub fn new(
        cloud_type: &str,
        location_qualifier: Option<&str>,
        direction: Option<&str>,
        direction_range: Option<&str>,
        moving_direction: Option<&str>,
    ) -> Self {
        Self {
            cloud_type: cloud_type.trim().to_string(),
            location_qualifier: location_qualifier.map(str::to_string),
            direction: direction.map(str::to_string),
            direction_range: direction_range.map(str::to_string),
            moving_direction: moving_direction.map(str::to_string),
        }
    }

    pub fn of(cloud_type: &str, direction: &str) -> Self {
        Self::new(cloud_type, None, Some(direction), None, None)
    }

    pub fn with_movement(cloud_type: &str, direction: &str, moving_direction: &str) -> Self {
        Self::new(cloud_type, None, Some(direction), None, Some(moving_direction))
    }

    pub fn cloud_type(&self) -> &str {
        &self.cloud_type
    }

    pub fn location_qualifier(&self) -> Option<&str> {
        self.location_qualifier.as_deref()
    }

    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    pub fn direction_range(&self) -> Option<&str> {
        self.direction_range.as_deref()
    }

    pub fn moving_direction(&self) -> Option<&str> {
        self.moving_direction.as_deref()
    }

    pub fn is_moving(&self) -> bool {
        self.moving_direction.is_some()
    }

    pub fn is_thunderstorm(&self) -> bool {
        self.cloud_type == "TS"
    }

    pub fn has_direction_range(&self) -> bool {
        self.direction_range.is_some()
    }

    pub fn has_location_qualifier(&self) -> bool {
        self.location_qualifier.is_some()
    }

    pub fn cloud_type_description(&self) -> &str {
        match self.cloud_type.as_str() {
            "TS" => "Thunderstorm",
            "CB" => "Cumulonimbus",
            "TCU" => "Towering Cumulus",
            "ACC" => "Altocumulus Castellanus",
            "CBMAM" => "Cumulonimbus Mammatus",
            "VIRGA" => "Virga",
            other => other,
        }
    }

    pub fn location_qualifier_description(&self) -> Option<&str> {
        self.location_qualifier.as_deref().map(|q| match q {
            "OHD" => "Overhead",
            "VC" => "In vicinity",
            "DSNT" => "Distant",
            "DSIPTD" => "Dissipated",
            "TOP" => "At or above level",
            "TR" => "At all quadrants",
            other => other,
        })
    }

    pub fn summary(&self) -> String {
        let mut summary = self.cloud_type_description().to_string();
        if let Some(qualifier) = self.location_qualifier_description() {
            summary.push(' ');
            summary.push_str(qualifier);
        }
        if let Some(direction) = &self.direction {
            summary.push(' ');
            summary.push_str(direction);
            if let Some(range) = &self.direction_range {
                summary.push('-');
                summary.push_str(range);
            }
        }
        if let Some(moving) = &self.moving_direction {
            summary.push_str(" Moving ");
            summary.push_str(moving);
        }
        summary
    }
}
